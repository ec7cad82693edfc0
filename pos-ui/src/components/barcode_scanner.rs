//! Barcode Scanner Component
//!
//! Opens the camera and decodes retail barcodes with the ZXing browser
//! build loaded in `index.html`. Starts in fast mode, switches to robust
//! mode when nothing was confirmed quickly, and keeps stepping the zoom
//! while it runs. Each mount reports at most one code.

use gloo_timers::callback::{Interval, Timeout};
use js_sys::{Array, Object, Reflect};
use leptos::*;
use pos_client::scanner::{
    next_zoom, pick_camera, CameraDevice, Facing, ReadConfirmer, ScanMode, StreamSize,
    ROBUST_AFTER_MS, ZOOM_INTERVAL_MS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaDeviceInfo, MediaDeviceKind, MediaDevices, MediaStream, MediaStreamTrack};

use crate::browser;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ZXingBrowser)]
    type BrowserMultiFormatReader;

    #[wasm_bindgen(constructor, js_namespace = ZXingBrowser)]
    fn new(hints: &js_sys::Map, options: &Object) -> BrowserMultiFormatReader;

    #[wasm_bindgen(method, js_name = decodeFromVideoElement)]
    fn decode_from_video_element(
        this: &BrowserMultiFormatReader,
        video: &HtmlVideoElement,
        callback: &js_sys::Function,
    ) -> js_sys::Promise;

    type ScannerControls;

    #[wasm_bindgen(method)]
    fn stop(this: &ScannerControls);

    type DecodeResult;

    #[wasm_bindgen(method, js_name = getText)]
    fn get_text(this: &DecodeResult) -> String;
}

/// Everything one scanner mount owns
#[derive(Default)]
struct ScanSession {
    stopped: bool,
    confirmer: ReadConfirmer,
    stream: Option<MediaStream>,
    controls: Option<ScannerControls>,
    callback: Option<Closure<dyn FnMut(JsValue)>>,
    zoom_timer: Option<Interval>,
    robust_timer: Option<Timeout>,
}

impl ScanSession {
    fn video_track(&self) -> Option<MediaStreamTrack> {
        self.stream
            .as_ref()?
            .get_video_tracks()
            .get(0)
            .dyn_into::<MediaStreamTrack>()
            .ok()
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.zoom_timer.take();
        self.robust_timer.take();
        if let Some(controls) = self.controls.take() {
            controls.stop();
        }
        if let Some(stream) = self.stream.take() {
            stop_tracks(&stream);
        }
        if let Some(callback) = self.callback.take() {
            retire(callback);
        }
    }
}

/// Drop a decode callback outside of its own invocation
fn retire(callback: Closure<dyn FnMut(JsValue)>) {
    Timeout::new(0, move || drop(callback)).forget();
}

#[component]
pub fn BarcodeScanner(
    /// Receives the confirmed code
    #[prop(into)]
    on_result: Callback<String>,
    #[prop(default = Facing::Back)]
    facing: Facing,
) -> impl IntoView {
    let video_ref = create_node_ref::<html::Video>();
    let (error, set_error) = create_signal(None::<String>);
    let session = Rc::new(RefCell::new(ScanSession::default()));

    let session_for_start = session.clone();
    video_ref.on_load(move |video| {
        let video: HtmlVideoElement = (*video).clone();
        spawn_local(async move {
            if let Err(message) = start(video, session_for_start, facing, on_result).await {
                set_error.set(Some(message));
            }
        });
    });

    on_cleanup(move || session.borrow_mut().stop());

    view! {
        <div class="bg-black rounded-lg overflow-hidden relative">
            <video
                node_ref=video_ref
                class="w-full max-h-72 object-cover"
                autoplay=true
                muted=true
                playsinline=true
            />
            {move || error.get().map(|msg| view! {
                <p class="absolute bottom-0 inset-x-0 bg-red-700/80 text-sm px-3 py-2">{msg}</p>
            })}
        </div>
    }
}

async fn start(
    video: HtmlVideoElement,
    session: Rc<RefCell<ScanSession>>,
    facing: Facing,
    on_result: Callback<String>,
) -> Result<(), String> {
    let devices = media_devices().ok_or("Este navegador no permite usar la cámara.")?;

    // Device labels only show up after a first permission grant
    if let Ok(warm) = get_user_media(&devices, &obj(&[("video", JsValue::TRUE)])).await {
        stop_tracks(&warm);
    }

    let cameras = list_cameras(&devices).await;
    let camera = pick_camera(&cameras, facing).ok_or("No hay cámaras disponibles")?;

    let constraints = stream_constraints(&camera.device_id, facing, ScanMode::Fast.stream());
    let stream = get_user_media(&devices, &constraints)
        .await
        .map_err(|e| format!("No se pudo abrir la cámara: {}", js_message(&e)))?;
    video.set_src_object(Some(&stream));
    if let Ok(playing) = video.play() {
        let _ = JsFuture::from(playing).await;
    }

    if session.borrow().stopped {
        stop_tracks(&stream);
        return Ok(());
    }
    session.borrow_mut().stream = Some(stream);

    start_reader(&video, &session, ScanMode::Fast, on_result).await?;

    let session_for_zoom = session.clone();
    let zoom_timer = Interval::new(ZOOM_INTERVAL_MS, move || {
        if let Some(track) = session_for_zoom.borrow().video_track() {
            step_zoom(&track);
        }
    });

    let session_for_robust = session.clone();
    let robust_timer = Timeout::new(ROBUST_AFTER_MS, move || {
        spawn_local(async move {
            let session = session_for_robust;
            {
                let current = session.borrow();
                if current.stopped || current.confirmer.has_fired() {
                    return;
                }
                if let Some(track) = current.video_track() {
                    apply_stream_size(&track, ScanMode::Robust.stream());
                }
            }
            if let Err(message) = start_reader(&video, &session, ScanMode::Robust, on_result).await {
                browser::log_error("Robust scan failed", &message);
            }
        });
    });

    let mut current = session.borrow_mut();
    if current.stopped {
        current.stop();
    } else {
        current.zoom_timer = Some(zoom_timer);
        current.robust_timer = Some(robust_timer);
    }
    Ok(())
}

/// (Re)start decoding with the settings of `mode`
async fn start_reader(
    video: &HtmlVideoElement,
    session: &Rc<RefCell<ScanSession>>,
    mode: ScanMode,
    on_result: Callback<String>,
) -> Result<(), String> {
    {
        let mut current = session.borrow_mut();
        if let Some(controls) = current.controls.take() {
            controls.stop();
        }
        if let Some(callback) = current.callback.take() {
            retire(callback);
        }
    }

    let options = obj(&[("delayBetweenScanAttempts", JsValue::from(mode.delay_ms()))]);
    let reader = BrowserMultiFormatReader::new(&hints_for(mode), &options);

    let reads = session.clone();
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |result: JsValue| {
        if result.is_null() || result.is_undefined() {
            return;
        }
        let text = result.unchecked_into::<DecodeResult>().get_text();
        let confirmed = reads.borrow_mut().confirmer.push(&text);
        if let Some(code) = confirmed {
            on_result.call(code);
        }
    });

    let started = reader.decode_from_video_element(video, callback.as_ref().unchecked_ref());
    let controls = JsFuture::from(started)
        .await
        .map_err(|e| format!("No se pudo iniciar el lector: {}", js_message(&e)))?;

    let mut current = session.borrow_mut();
    current.controls = Some(controls.unchecked_into());
    current.callback = Some(callback);
    if current.stopped {
        current.stop();
    }
    Ok(())
}

fn hints_for(mode: ScanMode) -> js_sys::Map {
    let hints = js_sys::Map::new();
    let formats: Array = mode
        .formats()
        .iter()
        .filter_map(|f| zxing_enum("BarcodeFormat", f.zxing_name()))
        .collect();
    if let Some(key) = zxing_enum("DecodeHintType", "POSSIBLE_FORMATS") {
        hints.set(&key, &formats);
    }
    if mode.try_harder() {
        if let Some(key) = zxing_enum("DecodeHintType", "TRY_HARDER") {
            hints.set(&key, &JsValue::TRUE);
        }
    }
    if mode.also_inverted() {
        if let Some(key) = zxing_enum("DecodeHintType", "ALSO_INVERTED") {
            hints.set(&key, &JsValue::TRUE);
        }
    }
    hints
}

/// `ZXing.<group>.<member>` from the UMD global
fn zxing_enum(group: &str, member: &str) -> Option<JsValue> {
    let zxing = Reflect::get(&js_sys::global(), &"ZXing".into()).ok()?;
    let group = Reflect::get(&zxing, &group.into()).ok()?;
    let value = Reflect::get(&group, &member.into()).ok()?;
    (!value.is_undefined()).then_some(value)
}

fn media_devices() -> Option<MediaDevices> {
    web_sys::window()?.navigator().media_devices().ok()
}

async fn get_user_media(devices: &MediaDevices, constraints: &JsValue) -> Result<MediaStream, JsValue> {
    let promise = devices.get_user_media_with_constraints(constraints.unchecked_ref())?;
    JsFuture::from(promise).await?.dyn_into::<MediaStream>()
}

async fn list_cameras(devices: &MediaDevices) -> Vec<CameraDevice> {
    let Ok(promise) = devices.enumerate_devices() else {
        return Vec::new();
    };
    let Ok(list) = JsFuture::from(promise).await else {
        return Vec::new();
    };
    Array::from(&list)
        .iter()
        .filter_map(|d| d.dyn_into::<MediaDeviceInfo>().ok())
        .filter(|d| d.kind() == MediaDeviceKind::Videoinput)
        .map(|d| CameraDevice {
            device_id: d.device_id(),
            label: d.label(),
        })
        .collect()
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

fn facing_mode(facing: Facing) -> &'static str {
    match facing {
        Facing::Back => "environment",
        Facing::Front => "user",
    }
}

fn ideal(value: u32) -> JsValue {
    obj(&[("ideal", JsValue::from(value))])
}

fn stream_constraints(device_id: &str, facing: Facing, size: StreamSize) -> JsValue {
    let video = obj(&[
        ("deviceId", obj(&[("exact", JsValue::from_str(device_id))])),
        ("facingMode", JsValue::from_str(facing_mode(facing))),
        ("width", ideal(size.width)),
        ("height", ideal(size.height)),
        ("frameRate", ideal(size.frame_rate)),
    ]);
    obj(&[("video", video), ("audio", JsValue::FALSE)])
}

fn apply_stream_size(track: &MediaStreamTrack, size: StreamSize) {
    let advanced = Array::of1(&obj(&[("focusMode", JsValue::from_str("continuous"))]));
    let constraints = obj(&[
        ("width", ideal(size.width)),
        ("height", ideal(size.height)),
        ("frameRate", ideal(size.frame_rate)),
        ("advanced", advanced.into()),
    ]);
    call_method(track, "applyConstraints", &Array::of1(&constraints));
}

/// One zoom step, on cameras that report a zoom range
fn step_zoom(track: &MediaStreamTrack) {
    let Some(caps) = call_method(track, "getCapabilities", &Array::new()) else {
        return;
    };
    let Some(zoom) = Reflect::get(&caps, &"zoom".into()).ok().filter(|z| z.is_object()) else {
        return;
    };
    let number = |target: &JsValue, key: &str| Reflect::get(target, &key.into()).ok()?.as_f64();

    let min = number(&zoom, "min").unwrap_or(1.0);
    let max = number(&zoom, "max").unwrap_or(1.0);
    let step = number(&zoom, "step");
    let current = call_method(track, "getSettings", &Array::new())
        .and_then(|settings| number(&settings, "zoom"))
        .unwrap_or(min);

    let advanced = Array::of1(&obj(&[("zoom", JsValue::from(next_zoom(current, step, max)))]));
    call_method(track, "applyConstraints", &Array::of1(&obj(&[("advanced", advanced.into())])));
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Option<JsValue> {
    let method = Reflect::get(target, &name.into())
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    method.apply(target, args).ok()
}

fn obj(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

fn js_message(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| Reflect::get(error, &"message".into()).ok()?.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}
