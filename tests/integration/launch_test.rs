/// Integration tests driving the built binary and reading its JSON envelope.
#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};
    use std::process::Command;

    const BIN: &str = env!("CARGO_BIN_EXE_client-launcher");

    struct Run {
        code: i32,
        json: Value,
    }

    fn run(home: &Path, args: &[&str]) -> Run {
        let output = Command::new(BIN)
            .args(args)
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("APPDATA", home.join("AppData"))
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run client-launcher");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json = serde_json::from_str(&stdout).expect("output is not valid JSON");
        Run { code: output.status.code().unwrap_or(-1), json }
    }

    fn write_config(dir: &Path, section: Value) -> PathBuf {
        let doc = json!({
            "version": 1,
            "windows": section.clone(),
            "macos": section.clone(),
            "linux": section,
        });
        let path = dir.join("config.json");
        std::fs::write(&path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
        path
    }

    fn rdp_config(dir: &Path) -> PathBuf {
        write_config(
            dir,
            json!({
                "remotedesktop": [{
                    "name": "freerdp",
                    "protocol": ["rdp"],
                    "path": "xfreerdp",
                    "arg_format": "/v:{host}:{port} /u:{username} /p:{value}"
                }]
            }),
        )
    }

    #[test]
    fn version_command_outputs_json() {
        let tmp = tempfile::tempdir().unwrap();
        let r = run(tmp.path(), &["version"]);
        assert_eq!(r.code, 0);
        assert_eq!(r.json["ok"], true);
        assert_eq!(r.json["command"], "version");
        assert!(r.json["data"]["version"].is_string());
    }

    #[test]
    fn version_does_not_need_a_config_directory() {
        let output = Command::new(BIN)
            .arg("version")
            .env_clear()
            .output()
            .expect("failed to run client-launcher");
        let json: Value = serde_json::from_slice(&output.stdout).expect("output is not valid JSON");
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(json["ok"], true);
    }

    #[test]
    fn resolve_prints_compiled_invocation_without_secret() {
        let tmp = tempfile::tempdir().unwrap();
        let config = rdp_config(tmp.path());
        let descriptor = r#"{"protocol":"rdp","host":"10.0.0.5","username":"alice","value":"S3cret!"}"#;
        let r = run(
            tmp.path(),
            &["resolve", "--config", config.to_str().unwrap(), "--descriptor", descriptor],
        );
        assert_eq!(r.code, 0);
        assert_eq!(r.json["data"]["matched"], true);
        assert_eq!(r.json["data"]["profile"], "freerdp");
        assert_eq!(
            r.json["data"]["invocation"]["args"],
            json!(["/v:10.0.0.5:3389", "/u:alice", "/p:***"])
        );
        assert!(!r.json.to_string().contains("S3cret!"));
    }

    #[test]
    fn unconfigured_protocol_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = rdp_config(tmp.path());
        let r = run(
            tmp.path(),
            &[
                "launch",
                "--config",
                config.to_str().unwrap(),
                "--descriptor",
                r#"{"protocol":"mysql","host":"db","username":"root"}"#,
            ],
        );
        assert_eq!(r.code, 0);
        assert_eq!(r.json["ok"], true);
        assert_eq!(r.json["data"]["launched"], false);
        assert_eq!(r.json["data"]["reason"], "no_matching_application");
    }

    #[test]
    fn url_input_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let config = rdp_config(tmp.path());
        // {"protocol":"rdp","host":"h","username":"u"}
        let url = "client-launcher://eyJwcm90b2NvbCI6InJkcCIsImhvc3QiOiJoIiwidXNlcm5hbWUiOiJ1In0=";
        let r = run(tmp.path(), &["resolve", "--config", config.to_str().unwrap(), "--url", url]);
        assert_eq!(r.code, 0);
        assert_eq!(r.json["data"]["invocation"]["args"][0], "/v:h:3389");
    }

    #[test]
    fn malformed_descriptor_is_invalid_args() {
        let tmp = tempfile::tempdir().unwrap();
        let config = rdp_config(tmp.path());
        let r = run(
            tmp.path(),
            &["launch", "--config", config.to_str().unwrap(), "--descriptor", "{not json"],
        );
        assert_eq!(r.code, 1);
        assert_eq!(r.json["ok"], false);
        assert_eq!(r.json["error"]["code"], "INVALID_ARGS");
    }

    #[test]
    fn missing_config_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        let r = run(tmp.path(), &["profiles", "--config", missing.to_str().unwrap()]);
        assert_eq!(r.code, 1);
        assert_eq!(r.json["error"]["code"], "CONFIG_INVALID");

        let status = run(tmp.path(), &["status", "--config", missing.to_str().unwrap()]);
        assert_eq!(status.code, 0);
        assert_eq!(status.json["data"]["config"]["loaded"], false);
    }

    #[test]
    fn profiles_lists_the_platform_section() {
        let tmp = tempfile::tempdir().unwrap();
        let config = rdp_config(tmp.path());
        let r = run(tmp.path(), &["profiles", "--config", config.to_str().unwrap()]);
        assert_eq!(r.json["data"]["count"], 1);
        assert_eq!(r.json["data"]["profiles"][0]["category"], "remotedesktop");
    }

    #[test]
    #[cfg(unix)]
    fn launch_spawns_the_configured_program() {
        let tmp = tempfile::tempdir().unwrap();
        let config = write_config(
            tmp.path(),
            json!({ "terminal": [{ "name": "true", "protocol": ["ssh"], "path": "true", "arg_format": "{host}" }] }),
        );
        let r = run(
            tmp.path(),
            &["launch", "--config", config.to_str().unwrap(), "--descriptor", r#"{"protocol":"ssh","host":"h"}"#],
        );
        assert_eq!(r.code, 0);
        assert_eq!(r.json["data"]["launched"], true);
        assert_eq!(r.json["data"]["profile"], "true");
        assert!(r.json["data"]["pid"].as_u64().unwrap() > 0);
    }
}
