use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};

use super::template::render_template;
use crate::types::Environment;

/// Names of the generated values available to every template.
pub const SYSTEM_VARIABLES: [&str; 10] = [
    "randomUUID4",
    "timeNow",
    "unixTimestamp",
    "randInt1000",
    "randInt100",
    "randInt",
    "randFloat",
    "randFloat32",
    "fullDate",
    "randBool",
];

/// A fresh set of generated values: ids, timestamps and random numbers.
///
/// Each call draws new values, so one request sees one consistent set.
pub fn system_variables() -> BTreeMap<String, String> {
    let now = Utc::now();
    let mut vars = BTreeMap::new();
    vars.insert("randomUUID4".to_string(), uuid::Uuid::new_v4().to_string());
    vars.insert("timeNow".to_string(), now.to_rfc3339_opts(SecondsFormat::Secs, true));
    vars.insert("unixTimestamp".to_string(), now.timestamp().to_string());
    vars.insert("randInt1000".to_string(), fastrand::u32(0..1000).to_string());
    vars.insert("randInt100".to_string(), fastrand::u32(0..100).to_string());
    vars.insert("randInt".to_string(), fastrand::i64(0..).to_string());
    vars.insert("randFloat".to_string(), format!("{:.6}", fastrand::f64()));
    vars.insert("randFloat32".to_string(), format!("{:.6}", fastrand::f32()));
    vars.insert(
        "fullDate".to_string(),
        now.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
    );
    vars.insert("randBool".to_string(), fastrand::bool().to_string());
    vars
}

/// The variables a request is rendered with.
///
/// Enabled environment values are rendered through the generated values
/// first, then layered over them, so an environment key shadows a system
/// variable of the same name.
pub fn request_variables(env: Option<&Environment>) -> BTreeMap<String, String> {
    let mut vars = system_variables();
    let Some(env) = env else {
        return vars;
    };
    let rendered: Vec<(String, String)> = env
        .enabled_values()
        .into_iter()
        .map(|(k, v)| (k, render_template(&v, &vars)))
        .collect();
    vars.extend(rendered);
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_system_variable_is_generated() {
        let vars = system_variables();
        for name in SYSTEM_VARIABLES {
            assert!(vars.contains_key(name), "missing {name}");
        }
        assert_eq!(vars.len(), SYSTEM_VARIABLES.len());
    }

    #[test]
    fn generated_values_have_expected_shapes() {
        let vars = system_variables();
        assert!(uuid::Uuid::parse_str(&vars["randomUUID4"]).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&vars["timeNow"]).is_ok());
        assert!(chrono::DateTime::parse_from_rfc2822(&vars["fullDate"]).is_ok());
        assert!(vars["unixTimestamp"].parse::<i64>().unwrap() > 0);
        assert!(vars["randInt100"].parse::<u32>().unwrap() < 100);
        assert!(vars["randInt1000"].parse::<u32>().unwrap() < 1000);
        assert!(vars["randInt"].parse::<i64>().unwrap() >= 0);
        let f: f64 = vars["randFloat"].parse().unwrap();
        assert!((0.0..=1.0).contains(&f));
        assert_eq!(vars["randFloat"].split('.').nth(1).map(str::len), Some(6));
        assert!(matches!(vars["randBool"].as_str(), "true" | "false"));
    }

    #[test]
    fn environment_values_are_rendered_through_system_variables() {
        let mut env = Environment::with_id("dev", "Dev");
        env.set_key("trace", "t-{{randomUUID4}}");
        env.set_key("user", "{{name}}");

        let vars = request_variables(Some(&env));

        let trace = &vars["trace"];
        assert!(trace.starts_with("t-"));
        assert!(uuid::Uuid::parse_str(&trace[2..]).is_ok());
        assert_eq!(vars["user"], "{{name}}");
    }

    #[test]
    fn environment_keys_shadow_system_variables() {
        let mut env = Environment::with_id("dev", "Dev");
        env.set_key("randBool", "maybe");

        let vars = request_variables(Some(&env));

        assert_eq!(vars["randBool"], "maybe");
        assert!(vars.contains_key("timeNow"));
    }

    #[test]
    fn no_environment_yields_system_variables_only() {
        assert_eq!(request_variables(None).len(), SYSTEM_VARIABLES.len());
    }
}
