//! Audit log presentation and filters

use serde_json::Value;

use crate::models::AuditEvent;

/// Change summaries longer than this are cut and end with `…`
pub const CHANGES_PREVIEW_CHARS: usize = 120;

/// Spanish label of a known action; unknown actions show their code
pub fn action_label(action: &str) -> &str {
    match action {
        "SALE_CHECKOUT" => "Venta realizada",
        "SALE_VOID" => "Venta anulada",
        "PRICE_CHANGE" => "Cambio de precio",
        other => other,
    }
}

/// Who did it: `user_name`, else the nested actor's username, else the raw actor
pub fn actor_display(event: &AuditEvent) -> String {
    if let Some(name) = event.user_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match &event.actor {
        Some(Value::Object(map)) => map
            .get("username")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "-".to_string()),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

/// Compact JSON of the change set, truncated for the table
pub fn changes_summary(changes: &Value) -> String {
    let text = match changes {
        Value::Null => return "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() <= CHANGES_PREVIEW_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(CHANGES_PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Exact action code; empty matches all
    pub action: String,
    /// Model name, compared case-insensitively; empty matches all
    pub model: String,
    pub text: String,
}

impl AuditFilter {
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if !self.action.is_empty() && event.action != self.action {
            return false;
        }
        let model = self.model.trim();
        if !model.is_empty() && !event.model.eq_ignore_ascii_case(model) {
            return false;
        }
        let text = self.text.trim().to_lowercase();
        if text.is_empty() {
            return true;
        }
        [
            actor_display(event),
            event.action.clone(),
            event.model.clone(),
            event.obj_id.clone(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&text))
    }

    /// Matching events, newest first
    pub fn apply<'a>(&self, events: &'a [AuditEvent]) -> Vec<&'a AuditEvent> {
        let mut found: Vec<&AuditEvent> = events.iter().filter(|e| self.matches(e)).collect();
        found.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        found
    }
}

/// Distinct action codes present, for the filter select
pub fn known_actions(events: &[AuditEvent]) -> Vec<String> {
    let mut actions: Vec<String> = events.iter().map(|e| e.action.clone()).collect();
    actions.sort();
    actions.dedup();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> AuditEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_actor_display_fallbacks() {
        let named = event(json!({"action": "SALE_VOID", "user_name": "ana", "actor": 3}));
        let nested = event(json!({"action": "SALE_VOID", "actor": {"id": 3, "username": "pedro"}}));
        let raw = event(json!({"action": "SALE_VOID", "actor": 3}));
        let nobody = event(json!({"action": "SALE_VOID"}));

        assert_eq!(actor_display(&named), "ana");
        assert_eq!(actor_display(&nested), "pedro");
        assert_eq!(actor_display(&raw), "3");
        assert_eq!(actor_display(&nobody), "-");
    }

    #[test]
    fn test_labels() {
        assert_eq!(action_label("SALE_CHECKOUT"), "Venta realizada");
        assert_eq!(action_label("PRICE_CHANGE"), "Cambio de precio");
        assert_eq!(action_label("USER_LOGIN"), "USER_LOGIN");
    }

    #[test]
    fn test_changes_truncated() {
        let long = json!({"note": "x".repeat(200)});
        let summary = changes_summary(&long);
        assert_eq!(summary.chars().count(), CHANGES_PREVIEW_CHARS + 1);
        assert!(summary.ends_with('…'));
        assert_eq!(changes_summary(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(changes_summary(&Value::Null), "-");
    }

    #[test]
    fn test_filters() {
        let events = vec![
            event(json!({"id": 1, "action": "SALE_VOID", "model": "Sale", "obj_id": 15,
                         "user_name": "ana", "ts": "2024-05-02T10:00:00Z"})),
            event(json!({"id": 2, "action": "PRICE_CHANGE", "model": "Product", "obj_id": "7",
                         "user_name": "pedro", "ts": "2024-05-03T10:00:00Z"})),
            event(json!({"id": 3, "action": "SALE_CHECKOUT", "model": "sale", "obj_id": 16,
                         "user_name": "pedro", "ts": "2024-05-04T10:00:00Z"})),
        ];

        let by_model = AuditFilter {
            model: "SALE".into(),
            ..Default::default()
        };
        let ids: Vec<_> = by_model.apply(&events).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(3), Some(1)]);

        let by_action = AuditFilter {
            action: "SALE_VOID".into(),
            ..Default::default()
        };
        assert_eq!(by_action.apply(&events).len(), 1);

        let by_text = AuditFilter {
            text: "PEDRO".into(),
            ..Default::default()
        };
        assert_eq!(by_text.apply(&events).len(), 2);

        let by_obj = AuditFilter {
            text: "15".into(),
            ..Default::default()
        };
        assert_eq!(by_obj.apply(&events)[0].id, Some(1));

        assert_eq!(
            known_actions(&events),
            vec!["PRICE_CHANGE", "SALE_CHECKOUT", "SALE_VOID"]
        );
    }
}
