//! Command dispatch against a recording runner and a fake install on disk.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use envprobe_cli::{Commands, handlers};
use envprobe_core::{CommandOutput, Framework, ProcessEnv, Settings};
use envprobe_runtime::testing::RecordingRunner;
use envprobe_runtime::{EnvProbeService, SystemFs};
use tempfile::TempDir;

const MANAGER: &str = "envprobe-cli-stub";

fn home(installed: bool) -> TempDir {
    let home = tempfile::tempdir().unwrap();
    if installed {
        let bin = home.path().join("miniconda3/bin");
        std::fs::create_dir_all(&bin).unwrap();
        let exe = bin.join(MANAGER);
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    home
}

fn service(home: &TempDir, runner: Arc<RecordingRunner>) -> EnvProbeService {
    let settings = Settings {
        manager: Some(MANAGER.to_string()),
        scratch_dir: Some(home.path().to_path_buf()),
        ..Settings::default()
    };
    let env = ProcessEnv::from_pairs([
        ("HOME", home.path().display().to_string()),
        ("PATH", "/usr/local/bin:/usr/bin".to_string()),
    ]);
    EnvProbeService::new(runner, Arc::new(SystemFs), settings).with_process_env(env)
}

#[tokio::test]
async fn test_envs_text_and_json() {
    let home = home(true);
    let runner = Arc::new(RecordingRunner::new().respond(
        MANAGER,
        CommandOutput::ok(r#"{"envs": ["/opt/conda", "/opt/conda/envs/ml"]}"#),
    ));
    let svc = service(&home, runner);

    let text = handlers::dispatch(&svc, Commands::Envs, false).await.unwrap();
    assert!(text.contains("Conda Environments:\n- base (/opt/conda)\n- ml (/opt/conda/envs/ml)"));

    let json = handlers::dispatch(&svc, Commands::Envs, true).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "parsed");
    assert_eq!(value["environments"][1]["name"], "ml");
}

#[tokio::test]
async fn test_envs_without_manager_fails_with_diagnostic() {
    let home = home(false);
    let svc = service(&home, Arc::new(RecordingRunner::new()));

    let err = handlers::dispatch(&svc, Commands::Envs, false).await.unwrap_err();

    assert_eq!(err.exit_code(), 69);
    assert!(err.to_string().contains("PATH directories:\n- /usr/local/bin\n- /usr/bin"));
}

#[tokio::test]
async fn test_invalid_package_env_spawns_nothing() {
    let home = home(true);
    let runner = Arc::new(RecordingRunner::new());
    let svc = service(&home, runner.clone());

    let err = handlers::dispatch(
        &svc,
        Commands::Packages {
            env: "base && reboot".to_string(),
        },
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 64);
    assert_eq!(err.to_json()["category"], "invalid_input");
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_probe_json_report() {
    let home = home(true);
    let runner = Arc::new(RecordingRunner::new().respond(
        MANAGER,
        CommandOutput::ok(
            r#"{"framework": "torch", "framework_version": "2.3.0", "accelerator_available": false, "unavailable_reason": "Hardware/OS not supported"}"#,
        ),
    ));
    let svc = service(&home, runner.clone());

    let json = handlers::dispatch(
        &svc,
        Commands::Probe {
            env: "ml".to_string(),
            framework: Framework::Torch,
        },
        true,
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["framework"], "torch");
    assert_eq!(value["accelerator_available"], false);

    let call = runner.calls().into_iter().last().unwrap();
    assert_eq!(&call.args_lossy()[..4], ["run", "-n", "ml", "python"]);
    // Script file is gone; only the fake install remains in the scratch dir.
    let leftovers: Vec<_> = std::fs::read_dir(home.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec!["miniconda3"]);
}

#[tokio::test]
async fn test_probe_timeout_exit_code() {
    let home = home(true);
    let runner = Arc::new(RecordingRunner::new().fail_timeout(MANAGER));
    let svc = service(&home, runner);

    let err = handlers::dispatch(
        &svc,
        Commands::Probe {
            env: "ml".to_string(),
            framework: Framework::TensorFlow,
        },
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 75);
}

#[tokio::test]
async fn test_inventory_list_and_rejection() {
    let home = home(true);
    let runner = Arc::new(RecordingRunner::new());
    let svc = service(&home, runner.clone());

    let listed = handlers::dispatch(
        &svc,
        Commands::Inventory {
            category: None,
            list: true,
        },
        false,
    )
    .await
    .unwrap();
    assert_eq!(listed.lines().count(), 19);
    assert!(listed.lines().any(|l| l == "SPDisplaysDataType"));

    let err = handlers::dispatch(
        &svc,
        Commands::Inventory {
            category: Some("SPSecretsDataType".to_string()),
            list: false,
        },
        false,
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 64);
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_locate_reports_strategy() {
    let home = home(true);
    let svc = service(&home, Arc::new(RecordingRunner::new()));

    let text = handlers::dispatch(&svc, Commands::Locate, false).await.unwrap();

    assert!(text.ends_with("(found via conventional-paths)"));
    assert!(text.starts_with(&home.path().display().to_string()));
}
