use ahatool_core::{AhatoolError, Properties, StartMode};
use ahatool_tools::testing::{MockRuntime, RuntimeCall};
use ahatool_tools::{Ahatool, AhatoolContainer, ArgumentCheck, BuildingBlock, ExecutionTarget};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn direct(props: Properties, runtime: MockRuntime) -> Ahatool<MockRuntime> {
    Ahatool::with_runtime("test.fasta", "output.zip", props, runtime).unwrap()
}

fn container(props: Properties, runtime: MockRuntime) -> AhatoolContainer<MockRuntime> {
    AhatoolContainer::with_runtime("test.fasta", "output.zip", props, runtime).unwrap()
}

// ===== Direct block =====

#[test]
fn test_direct_command_for_reference_inputs() {
    let props = Properties {
        threads: Some(2),
        database: Some("nr_test.fa".into()),
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new());

    assert_eq!(block.launch().unwrap(), 0);

    let cmd = block.command().unwrap();
    assert_eq!(
        cmd.to_args(),
        vec!["AHATool.sh", "-d nr_test.fa -t 2", "output.zip", "test.fasta"]
    );
    assert_eq!(block.runtime().targets(), vec![ExecutionTarget::Host]);
}

#[test]
fn test_direct_all_flags() {
    let props = Properties {
        prefix: Some("2410151200".into()),
        start: Some(StartMode::Build),
        database: Some("nr.fa".into()),
        evalue: Some(1e-10),
        threads: Some(4),
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new());
    block.launch().unwrap();

    assert_eq!(
        block.command().unwrap().to_args()[1],
        "-p 2410151200 -s build -d nr.fa -e 1e-10 -t 4"
    );
}

#[test]
fn test_direct_pipeline_order() {
    let mut block = direct(Properties::default(), MockRuntime::new());
    block.launch().unwrap();

    let calls = block.runtime().calls();
    let cmd = block.command().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            RuntimeCall::ValidateProperties,
            RuntimeCall::ValidateArguments(ArgumentCheck::Inputs),
            RuntimeCall::CheckRestart,
            RuntimeCall::StageFiles,
            RuntimeCall::CreateUniqueDir(PathBuf::from("/mock/tmp_1")),
            RuntimeCall::Run {
                command: cmd,
                target: ExecutionTarget::Host,
            },
            RuntimeCall::CopyToHost,
            RuntimeCall::RemoveTmpFiles(vec![
                PathBuf::from("/mock/staging"),
                PathBuf::from("/mock/tmp_1"),
            ]),
            RuntimeCall::ValidateArguments(ArgumentCheck::OutputsCreated { raise: false }),
        ]
    );
}

#[test]
fn test_keep_tmp_files() {
    let props = Properties {
        remove_tmp: false,
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new());
    block.launch().unwrap();

    assert!(!block
        .runtime()
        .calls()
        .iter()
        .any(|call| matches!(call, RuntimeCall::RemoveTmpFiles(_))));
}

#[test]
fn test_exit_code_is_propagated() {
    let mut block = direct(Properties::default(), MockRuntime::new().with_exit_code(127));

    assert_eq!(block.launch().unwrap(), 127);
    // Post-condition is checked but never fatal
    assert!(block
        .runtime()
        .calls()
        .contains(&RuntimeCall::ValidateArguments(ArgumentCheck::OutputsCreated { raise: false })));
}

#[test]
fn test_failed_run_still_removes_tmp_files() {
    let mut block = direct(
        Properties::default(),
        MockRuntime::new().with_run_error("failed to start AHATool.sh"),
    );

    assert!(matches!(block.launch(), Err(AhatoolError::Execution(_))));
    assert!(block.command().is_none());

    let calls = block.runtime().calls();
    assert!(!calls.contains(&RuntimeCall::CopyToHost));
    assert_eq!(
        calls.last(),
        Some(&RuntimeCall::RemoveTmpFiles(vec![
            PathBuf::from("/mock/staging"),
            PathBuf::from("/mock/tmp_1"),
        ]))
    );
}

#[test]
fn test_failed_run_keeps_tmp_files_when_asked() {
    let props = Properties {
        remove_tmp: false,
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new().with_run_error("spawn failed"));

    assert!(block.launch().is_err());
    assert!(!block
        .runtime()
        .calls()
        .iter()
        .any(|call| matches!(call, RuntimeCall::RemoveTmpFiles(_))));
}

#[test]
fn test_restart_short_circuit() {
    let props = Properties {
        restart: true,
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new().with_existing_outputs());

    assert_eq!(block.launch().unwrap(), 0);
    assert!(block.command().is_none());
    assert_eq!(
        block.runtime().calls(),
        vec![
            RuntimeCall::ValidateProperties,
            RuntimeCall::ValidateArguments(ArgumentCheck::Inputs),
            RuntimeCall::CheckRestart,
        ]
    );
}

#[test]
fn test_restart_without_outputs_runs() {
    let props = Properties {
        restart: true,
        ..Properties::default()
    };
    let mut block = direct(props, MockRuntime::new());
    block.launch().unwrap();

    assert_eq!(block.runtime().commands().len(), 1);
}

#[test]
fn test_each_launch_builds_a_fresh_command() {
    let mut block = direct(Properties::default(), MockRuntime::new());
    block.launch().unwrap();
    block.launch().unwrap();

    assert_eq!(block.runtime().commands().len(), 2);
    assert!(block
        .runtime()
        .calls()
        .contains(&RuntimeCall::CreateUniqueDir(PathBuf::from("/mock/tmp_2"))));
}

// ===== Container block =====

#[test]
fn test_container_custom_database() {
    let props = Properties {
        threads: Some(2),
        database: Some("/data/custom.fa".into()),
        ..Properties::default()
    };
    let mut block = container(props, MockRuntime::new());
    block.launch().unwrap();

    let cmd = block.command().unwrap();
    assert_eq!(
        cmd.to_args(),
        vec![
            "../AHATools/AHATool.sh",
            "-d /home/database/custom.fa -t 2",
            "output.zip",
            "test.fasta"
        ]
    );

    let targets = block.runtime().targets();
    assert_eq!(targets.len(), 1);
    let mounts: Vec<String> = targets[0]
        .container()
        .unwrap()
        .mounts
        .iter()
        .map(|m| m.volume_arg())
        .collect();
    assert_eq!(mounts, vec!["/data:/home/database"]);
    assert_eq!(block.last_target(), Some(&targets[0]));
}

#[test]
fn test_container_default_database() {
    let props = Properties {
        database: Some("nr.fa".into()),
        evalue: Some(1e-10),
        ..Properties::default()
    };
    let mut block = container(props, MockRuntime::new());
    block.launch().unwrap();

    assert_eq!(block.command().unwrap().to_args()[1], "-e 1e-10");
    let targets = block.runtime().targets();
    assert!(targets[0].container().unwrap().mounts.is_empty());
}

#[test]
fn test_container_settings_from_properties() {
    let props = Properties {
        container_path: Some("podman".into()),
        container_image: Some("bsceapm/ahatool:1.9".into()),
        container_volume_path: Some("/work".into()),
        container_working_dir: Some("/work".into()),
        container_user_id: Some("1000".into()),
        ..Properties::default()
    };
    let mut block = container(props, MockRuntime::new());
    block.launch().unwrap();

    let targets = block.runtime().targets();
    let settings = targets[0].container().unwrap();
    assert_eq!(settings.container_path, "podman");
    assert_eq!(settings.image, "bsceapm/ahatool:1.9");
    assert_eq!(settings.volume_path, PathBuf::from("/work"));
    assert_eq!(settings.working_dir.as_deref(), Some("/work"));
    assert_eq!(settings.user_id.as_deref(), Some("1000"));
}

#[test]
fn test_container_restart_short_circuit() {
    let props = Properties {
        restart: true,
        database: Some("/data/custom.fa".into()),
        ..Properties::default()
    };
    let mut block = container(props, MockRuntime::new().with_existing_outputs());

    assert_eq!(block.launch().unwrap(), 0);
    assert!(block.runtime().commands().is_empty());
    assert!(block.last_target().is_none());
}
