//! Pure row classification and validation.
//!
//! Everything in this module is local: no remote calls. The update-time
//! immutability rules, which need the current remote record, are exposed as
//! [`immutability_violations`] and driven by the synchronizer after a fetch.
//!
//! All violations on a row accumulate; a row fails with its full message
//! list, never just the first hit.

use serde_json::Value;

use super::types::{Action, Resolution, SheetFlavor, PARAM_TYPES};
use crate::model::{ParamPayload, Parameter};
use crate::sheet::Row;

/// Action cell values that mean "leave this row alone".
///
/// Workbooks exported by the catalog fill unused cells with `-`, so both the
/// empty cell and the dash sentinel skip the row.
fn is_skip(action: &str) -> bool {
    action.is_empty() || action == "-"
}

/// `^[A-Za-z0-9_]+$`
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Tri-state cell: `True` (any case) is set, `-` or blank is not set.
/// Anything else is a violation.
fn parse_flag(cell: &str) -> Option<bool> {
    if cell.is_empty() || cell == "-" {
        Some(false)
    } else if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else {
        None
    }
}

/// Classify one row and run every local rule.
#[must_use]
pub fn validate_and_classify(row: &Row, flavor: SheetFlavor) -> Resolution {
    if is_skip(&row.action) {
        return Resolution::Skip;
    }

    let mut messages = Vec::new();
    let action = row.action.as_str();

    if !matches!(action, "create" | "update" | "delete") {
        messages.push(format!(
            "Supported actions are create, update, delete or an empty cell, provided {action}"
        ));
    }

    // A missing Verbose ID also drops the ID checks for the row; the shared
    // checks below still run.
    if matches!(action, "update" | "delete") && row.resource_id.is_empty() {
        messages.push("Verbose ID is required on update and delete actions.".to_string());
    } else if matches!(action, "create" | "update") {
        if row.local_key.is_empty() {
            messages.push("Parameter must have an id".to_string());
        } else if !is_valid_key(&row.local_key) {
            messages.push(format!(
                "Parameter ID must contain only letters, numbers and `_`, provided {}",
                row.local_key
            ));
        }
    }

    if !row.phase.is_empty() {
        if let Some(expected) = flavor.phase() {
            if row.phase != expected {
                messages.push(format!(
                    "Parameters of type {expected} are only supported when processing {}. \
                     Has been provided {}.",
                    flavor.sheet_name(),
                    row.phase
                ));
            }
        }
    }

    if !PARAM_TYPES.contains(&row.param_type.as_str()) {
        messages.push(format!(
            "Parameter type {} is not one of the supported ones:{}",
            row.param_type,
            PARAM_TYPES.join(",")
        ));
    }

    if !flavor.scopes().contains(&row.scope.as_str()) {
        messages.push(flavor.scope_error());
    }

    let required = parse_flag(&row.required);
    if required.is_none() {
        messages.push("Required must be either True or `-`".to_string());
    }
    let unique = parse_flag(&row.unique);
    if unique.is_none() {
        messages.push("Unique must be either True or `-`".to_string());
    }
    let hidden = parse_flag(&row.hidden);
    if hidden.is_none() {
        messages.push("Hidden must be either True or `-`".to_string());
    }

    // JSON properties must parse as an object; the payload merges its keys.
    let mut properties = serde_json::Map::new();
    if !row.constraints.is_empty() {
        match serde_json::from_str::<Value>(&row.constraints) {
            Ok(Value::Object(map)) => properties = map,
            _ => messages.push("JSON properties must have json format".to_string()),
        }
    }

    if !messages.is_empty() {
        return Resolution::Invalid(messages);
    }

    match action {
        "delete" => Resolution::Action(Action::Delete {
            resource_id: row.resource_id.clone(),
        }),
        "create" => Resolution::Action(Action::Create(build_payload(
            row,
            required.unwrap_or_default(),
            unique.unwrap_or_default(),
            hidden.unwrap_or_default(),
            properties,
        ))),
        _ => Resolution::Action(Action::Update {
            resource_id: row.resource_id.clone(),
            payload: build_payload(
                row,
                required.unwrap_or_default(),
                unique.unwrap_or_default(),
                hidden.unwrap_or_default(),
                properties,
            ),
        }),
    }
}

/// Update-time immutability violations against the current remote record.
///
/// The three checks are independent; a row that switches more than one
/// immutable field collects one message per field.
#[must_use]
pub fn immutability_violations(row: &Row, remote: &Parameter) -> Vec<String> {
    let mut messages = Vec::new();
    if remote.param_type != row.param_type {
        messages.push("Switching parameter type is not supported".to_string());
    }
    if remote.phase.as_deref().unwrap_or_default() != row.phase {
        messages.push("switching phase is not supported".to_string());
    }
    if remote.scope.as_deref().unwrap_or_default() != row.scope {
        messages.push("switching scope is not supported".to_string());
    }
    messages
}

/// Map a validated row into the remote parameter representation.
///
/// Flag keys win over colliding keys from the row's JSON properties.
fn build_payload(
    row: &Row,
    required: bool,
    unique: bool,
    hidden: bool,
    properties: serde_json::Map<String, Value>,
) -> ParamPayload {
    let mut constraints = properties;
    constraints.insert("required".to_string(), Value::Bool(required));
    constraints.insert("unique".to_string(), Value::Bool(unique));
    constraints.insert("hidden".to_string(), Value::Bool(hidden));

    ParamPayload {
        name: row.local_key.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        phase: (!row.phase.is_empty()).then(|| row.phase.clone()),
        scope: row.scope.clone(),
        param_type: row.param_type.clone(),
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> Row {
        Row {
            resource_id: "PRM-276-377-545-0008".to_string(),
            local_key: "a_param".to_string(),
            action: "create".to_string(),
            title: "Parameter".to_string(),
            description: "A parameter".to_string(),
            phase: "ordering".to_string(),
            scope: "asset".to_string(),
            param_type: "text".to_string(),
            required: "-".to_string(),
            unique: "-".to_string(),
            hidden: "-".to_string(),
            constraints: String::new(),
        }
    }

    fn messages(resolution: Resolution) -> Vec<String> {
        match resolution {
            Resolution::Invalid(messages) => messages,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_action_skips() {
        let mut row = valid_row();
        row.action = String::new();
        assert_eq!(
            validate_and_classify(&row, SheetFlavor::Ordering),
            Resolution::Skip
        );
        row.action = "-".to_string();
        assert_eq!(
            validate_and_classify(&row, SheetFlavor::Ordering),
            Resolution::Skip
        );
    }

    #[test]
    fn test_create_requires_local_key() {
        let mut row = valid_row();
        row.local_key = String::new();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["Parameter must have an id"]
        );
    }

    #[test]
    fn test_malformed_key_names_the_value() {
        let mut row = valid_row();
        row.action = "update".to_string();
        row.local_key = "XKL#".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["Parameter ID must contain only letters, numbers and `_`, provided XKL#"]
        );
    }

    #[test]
    fn test_update_requires_resource_id_and_drops_key_checks() {
        let mut row = valid_row();
        row.action = "update".to_string();
        row.resource_id = String::new();
        row.local_key = String::new();
        // The missing-key message is suppressed once the Verbose ID fails.
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["Verbose ID is required on update and delete actions."]
        );
    }

    #[test]
    fn test_phase_must_match_flavor() {
        let mut row = valid_row();
        row.phase = "fulfillment".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec![
                "Parameters of type ordering are only supported when processing \
                 Ordering Parameters. Has been provided fulfillment."
            ]
        );
    }

    #[test]
    fn test_phase_unconstrained_on_configuration_sheet() {
        let mut row = valid_row();
        row.phase = String::new();
        row.scope = "marketplace".to_string();
        assert!(matches!(
            validate_and_classify(&row, SheetFlavor::Configuration),
            Resolution::Action(_)
        ));
    }

    #[test]
    fn test_unknown_type_lists_supported_set() {
        let mut row = valid_row();
        row.param_type = "rocket".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec![
                "Parameter type rocket is not one of the supported ones:email,address,checkbox,\
                 choice,domain,subdomain,url,dropdown,object,password,phone,text"
            ]
        );
    }

    #[test]
    fn test_scope_outside_flavor_set() {
        let mut row = valid_row();
        row.scope = "marketplace".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["Only asset, tier1 and tier2 scopes are supported for Ordering Parameters"]
        );
    }

    #[test]
    fn test_tri_state_cells_fail_independently() {
        let mut row = valid_row();
        row.required = "rocket".to_string();
        row.hidden = "yes".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec![
                "Required must be either True or `-`",
                "Hidden must be either True or `-`"
            ]
        );
    }

    #[test]
    fn test_tri_state_true_is_case_insensitive() {
        let mut row = valid_row();
        row.required = "TRUE".to_string();
        row.unique = "True".to_string();
        let Resolution::Action(Action::Create(payload)) =
            validate_and_classify(&row, SheetFlavor::Ordering)
        else {
            panic!("expected a create action");
        };
        assert_eq!(payload.constraints["required"], Value::Bool(true));
        assert_eq!(payload.constraints["unique"], Value::Bool(true));
        assert_eq!(payload.constraints["hidden"], Value::Bool(false));
    }

    #[test]
    fn test_malformed_json_properties() {
        let mut row = valid_row();
        row.constraints = "nojson".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["JSON properties must have json format"]
        );
    }

    #[test]
    fn test_scalar_json_properties_rejected() {
        let mut row = valid_row();
        row.constraints = "42".to_string();
        assert_eq!(
            messages(validate_and_classify(&row, SheetFlavor::Ordering)),
            vec!["JSON properties must have json format"]
        );
    }

    #[test]
    fn test_violations_accumulate() {
        let mut row = valid_row();
        row.param_type = "rocket".to_string();
        row.scope = "rocket".to_string();
        row.required = "rocket".to_string();
        let found = messages(validate_and_classify(&row, SheetFlavor::Ordering));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_payload_merges_json_properties_under_flags() {
        let mut row = valid_row();
        row.constraints = r#"{"hint": "enter a value", "required": "shadowed"}"#.to_string();
        let Resolution::Action(Action::Create(payload)) =
            validate_and_classify(&row, SheetFlavor::Ordering)
        else {
            panic!("expected a create action");
        };
        assert_eq!(payload.name, "a_param");
        assert_eq!(payload.phase.as_deref(), Some("ordering"));
        assert_eq!(payload.constraints["hint"], Value::from("enter a value"));
        // The flag wins over the colliding JSON property.
        assert_eq!(payload.constraints["required"], Value::Bool(false));
    }

    #[test]
    fn test_delete_resolves_without_payload() {
        let mut row = valid_row();
        row.action = "delete".to_string();
        assert_eq!(
            validate_and_classify(&row, SheetFlavor::Ordering),
            Resolution::Action(Action::Delete {
                resource_id: "PRM-276-377-545-0008".to_string()
            })
        );
    }

    #[test]
    fn test_immutability_checks_are_independent() {
        let row = valid_row();
        let remote = Parameter {
            id: "PRM-276-377-545-0008".to_string(),
            name: "a_param".to_string(),
            title: None,
            description: None,
            phase: Some("fulfillment".to_string()),
            scope: Some("tier2".to_string()),
            param_type: "email".to_string(),
            constraints: None,
        };
        assert_eq!(
            immutability_violations(&row, &remote),
            vec![
                "Switching parameter type is not supported",
                "switching phase is not supported",
                "switching scope is not supported"
            ]
        );
    }

    #[test]
    fn test_immutability_passes_on_equal_fields() {
        let row = valid_row();
        let remote = Parameter {
            id: "PRM-276-377-545-0008".to_string(),
            name: "a_param".to_string(),
            title: None,
            description: None,
            phase: Some("ordering".to_string()),
            scope: Some("asset".to_string()),
            param_type: "text".to_string(),
            constraints: None,
        };
        assert!(immutability_violations(&row, &remote).is_empty());
    }
}
