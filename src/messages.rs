//! User-facing error messages
//!
//! Each mutation in the UI reports failures through its own message set:
//! permission denied on 403, not found on 404, validation on 400 and a
//! generic line for everything else.

use crate::api::ApiError;

pub const NOT_AUTHENTICATED: &str = "No autenticado.";

/// Messages for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMessages {
    pub forbidden: &'static str,
    pub not_found: Option<&'static str>,
    pub invalid: Option<&'static str>,
    /// Show the backend's `detail` on 400 when it sent one
    pub prefer_detail: bool,
    pub generic: &'static str,
}

impl ErrorMessages {
    pub const fn new(forbidden: &'static str, generic: &'static str) -> Self {
        Self {
            forbidden,
            not_found: None,
            invalid: None,
            prefer_detail: false,
            generic,
        }
    }

    /// Same text whatever went wrong
    pub const fn only(generic: &'static str) -> Self {
        Self::new(generic, generic)
    }

    pub const fn not_found(self, message: &'static str) -> Self {
        Self {
            not_found: Some(message),
            ..self
        }
    }

    pub const fn invalid(self, message: &'static str) -> Self {
        Self {
            invalid: Some(message),
            ..self
        }
    }

    pub const fn with_detail(self) -> Self {
        Self {
            prefer_detail: true,
            ..self
        }
    }

    /// Localized text for a failed call
    pub fn describe(&self, error: &ApiError) -> String {
        let text = match error {
            ApiError::Forbidden(_) => self.forbidden,
            ApiError::NotFound => self.not_found.unwrap_or(self.generic),
            ApiError::Validation(detail) => {
                if let (true, Some(detail)) = (self.prefer_detail, detail) {
                    return detail.clone();
                }
                self.invalid.unwrap_or(self.generic)
            }
            ApiError::Unauthorized | ApiError::SessionExpired => NOT_AUTHENTICATED,
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Status { .. } => self.generic,
        };
        text.to_string()
    }
}

pub const LOGIN: ErrorMessages =
    ErrorMessages::only("Credenciales inválidas o servidor no disponible.");

pub const LOAD_STOCK: ErrorMessages = ErrorMessages::only("Error cargando stock");

pub const UPDATE_PRODUCT: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para editar productos.",
    "Error al editar el producto.",
)
.invalid("Datos invalidos.")
.with_detail();

pub const TOGGLE_TOP_SELLER: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para cambiar Top Seller.",
    "No se pudo actualizar Top Seller.",
);

pub const DELETE_PRODUCT: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para eliminar productos.",
    "Error al eliminar el producto.",
)
.not_found("Producto no encontrado.")
.invalid("No se pudo eliminar.")
.with_detail();

pub const CREATE_PRODUCT: ErrorMessages = ErrorMessages::new(
    "Sin permisos: solo Dueño/Admin pueden crear productos.",
    "Error al crear producto. Revisa el backend.",
)
.invalid("Datos inválidos o código duplicado.");

pub const QUICK_CATEGORY: ErrorMessages =
    ErrorMessages::only("No se pudo crear la categoría (¿permisos?).");

pub const LOAD_CATEGORIES: ErrorMessages =
    ErrorMessages::new("Sin permisos para ver categorias.", "Error cargando categorias.");

pub const CREATE_CATEGORY: ErrorMessages =
    ErrorMessages::new("Sin permisos para crear.", "No se pudo crear.");

pub const RENAME_CATEGORY: ErrorMessages =
    ErrorMessages::new("Sin permisos para editar.", "No se pudo editar.");

pub const DELETE_CATEGORY: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para eliminar categorias.",
    "Ocurrio un error al eliminar la categoria.",
)
.invalid("Esta categoria no puede ser borrada porque tiene productos asociados.")
.with_detail();

pub const LOAD_PROMOTIONS: ErrorMessages =
    ErrorMessages::only("No se pudieron cargar las promociones.");

pub const CREATE_PROMOTION: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para crear promociones.",
    "No se pudo crear la promoción.",
)
.with_detail();

pub const TOGGLE_PROMOTION: ErrorMessages = ErrorMessages::only("No se pudo cambiar el estado.");

pub const DELETE_PROMOTION: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para eliminar la promoción.",
    "No se pudo eliminar la promoción.",
);

pub const CHECKOUT: ErrorMessages =
    ErrorMessages::only("No se pudo realizar la venta. Revisa tu sesión o el backend.")
        .with_detail();

pub const LOAD_SALES: ErrorMessages = ErrorMessages::only("No se pudieron cargar las ventas.");

pub const VOID_SALE: ErrorMessages = ErrorMessages::only("No se pudo anular (revisa permisos).");

pub const LOAD_CASH: ErrorMessages =
    ErrorMessages::only("No se pudo cargar el historial de caja.");

pub const OPEN_CASH: ErrorMessages = ErrorMessages::only("No se pudo abrir la caja.").with_detail();

pub const CLOSE_CASH: ErrorMessages = ErrorMessages::only("No se pudo cerrar la caja.").with_detail();

pub const LOAD_USERS: ErrorMessages = ErrorMessages::new(
    "Sin permisos para administrar usuarios.",
    "No se pudieron cargar usuarios.",
);

pub const CREATE_USER: ErrorMessages = ErrorMessages::new(
    "Sin permisos para crear usuarios.",
    "No se pudo crear el usuario.",
)
.with_detail();

pub const SET_ROLE: ErrorMessages =
    ErrorMessages::new("Sin permisos para cambiar roles.", "No se pudo actualizar el rol.");

pub const SET_USER_ACTIVE: ErrorMessages = ErrorMessages::only("No se pudo actualizar el estado.");

pub const DELETE_USER: ErrorMessages = ErrorMessages::new(
    "Sin permisos para eliminar usuarios.",
    "No se pudo eliminar el usuario.",
)
.not_found("Usuario no encontrado.");

pub const UPDATE_PROFILE: ErrorMessages = ErrorMessages::new(
    "No tienes permisos para actualizar este perfil.",
    "No se pudo guardar.",
)
.with_detail();

pub const LOAD_AUDIT: ErrorMessages = ErrorMessages::only("No se pudo cargar la bitácora.");

pub const LOAD_DASHBOARD: ErrorMessages =
    ErrorMessages::only("No se pudieron cargar datos del dashboard.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        let forbidden = ApiError::from_response(403, r#"{"detail": "nope"}"#);
        let missing = ApiError::from_response(404, "");
        let invalid = ApiError::from_response(400, r#"{"detail": "Stock insuficiente"}"#);
        let server = ApiError::from_response(500, "");

        assert_eq!(
            DELETE_PRODUCT.describe(&forbidden),
            "No tienes permisos para eliminar productos."
        );
        assert_eq!(DELETE_PRODUCT.describe(&missing), "Producto no encontrado.");
        assert_eq!(DELETE_PRODUCT.describe(&invalid), "Stock insuficiente");
        assert_eq!(DELETE_PRODUCT.describe(&server), "Error al eliminar el producto.");
    }

    #[test]
    fn test_fixed_validation_message_ignores_detail() {
        let invalid = ApiError::from_response(400, r#"{"code": ["product with this code already exists."]}"#);
        assert_eq!(CREATE_PRODUCT.describe(&invalid), "Datos inválidos o código duplicado.");
    }

    #[test]
    fn test_not_found_without_specific_text_is_generic() {
        assert_eq!(SET_ROLE.describe(&ApiError::NotFound), "No se pudo actualizar el rol.");
        assert_eq!(SET_ROLE.describe(&ApiError::SessionExpired), NOT_AUTHENTICATED);
        assert_eq!(
            LOAD_SALES.describe(&ApiError::Network("down".into())),
            "No se pudieron cargar las ventas."
        );
    }
}
