//! Property tests for version sanitizing and environment projection.

use duet_config::{BuildEnv, EnvValues, Target, UNSET_PLACEHOLDER, project, sanitize_version};
use proptest::prelude::*;

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|c| chars.any(|h| h == c))
}

fn env_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[A-Z_]{1,12}", "\\PC{0,16}"), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sanitized_is_restricted_subsequence(input in "\\PC{0,40}") {
        let out = sanitize_version(&input);
        prop_assert!(out.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || c == '.' || c == '-'));
        prop_assert!(is_subsequence(&out, &input));
    }

    #[test]
    fn sanitizing_is_idempotent(input in "\\PC{0,40}") {
        let once = sanitize_version(&input);
        prop_assert_eq!(sanitize_version(&once), once);
    }

    #[test]
    fn web_projection_stays_inside_allow_list(
        vars in env_strategy(),
        allow in prop::collection::vec("[A-Z_]{1,12}", 0..6),
    ) {
        let env = BuildEnv::from_pairs(vars);
        let projection = project(&env, &allow, Target::Web);
        prop_assert!(!projection.is_server);

        let EnvValues::Literals(values) = &projection.values else {
            return Err(TestCaseError::fail("web projection must carry literals"));
        };
        for (key, literal) in values {
            prop_assert!(allow.contains(key));
            let decoded: String = serde_json::from_str(literal).expect("literal is a JSON string");
            prop_assert_eq!(decoded.as_str(), env.get(key).unwrap_or(UNSET_PLACEHOLDER));
        }
        for key in &allow {
            prop_assert!(values.contains_key(key), "allow-listed {} missing", key);
        }
    }

    #[test]
    fn server_projection_ignores_environment(vars in env_strategy()) {
        let env = BuildEnv::from_pairs(vars);
        let projection = project(&env, &["NODE_ENV".to_string()], Target::Node);
        prop_assert!(projection.is_pass_through());
        prop_assert!(projection.is_server);
    }
}

#[test]
fn worked_examples() {
    assert_eq!(sanitize_version("^1.2.3-alpha.1"), "1.2.3-alpha.1");

    let env = BuildEnv::from_pairs([("BASE_URL", "https://x.com"), ("NODE_ENV", "production")]);
    let allow = vec!["BASE_URL".to_string(), "NODE_ENV".to_string()];

    let web = project(&env, &allow, Target::Web);
    let defines = web.define_map();
    assert_eq!(defines["process.env.BASE_URL"], "\"https://x.com\"");
    assert_eq!(defines["process.env.NODE_ENV"], "\"production\"");
    assert_eq!(defines["__SERVER__"], "false");

    let node = project(&env, &allow, Target::Node);
    assert!(node.is_pass_through());
    assert_eq!(node.define_map()["__SERVER__"], "true");
}
