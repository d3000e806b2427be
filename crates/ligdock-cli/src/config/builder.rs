use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileRunConfig, FileToolsConfig, FileWorkspaceConfig};
use super::models::AppConfig;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use ligdock::engine::config::BatchConfigBuilder;
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Merges CLI arguments, the optional config file, and built-in defaults, in that order of
/// precedence. Relative CLI paths resolve against `launch_dir`.
pub fn build_config(args: &RunArgs, launch_dir: &Path) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let (file_config, config_dir) = if let Some(config_path) = &args.config {
        let config_path = launch_dir.join(config_path);
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| launch_dir.to_path_buf());
        (FileConfig::from_file(&config_path)?, dir)
    } else {
        (FileConfig::default(), launch_dir.to_path_buf())
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let ws_file = file_config.workspace.take().unwrap_or_default();
    let tools_file = file_config.tools.take().unwrap_or_default();
    let run_file = file_config.run.take().unwrap_or_default();

    let root = match (&args.workspace, &ws_file.root) {
        (Some(cli_root), _) => launch_dir.join(cli_root),
        (None, Some(file_root)) => config_dir.join(file_root),
        (None, None) => launch_dir.to_path_buf(),
    };
    debug!("Resolved workspace root: {:?}", root);

    let pick_path = |cli: &Option<PathBuf>, file: Option<PathBuf>, default: &str| -> PathBuf {
        cli.clone()
            .or(file)
            .unwrap_or_else(|| PathBuf::from(default))
    };

    let batch = BatchConfigBuilder::new()
        .root(root)
        .receptor(pick_path(&args.receptor, ws_file.receptor, &defaults.receptor))
        .site(pick_path(&args.site, ws_file.site, &defaults.site))
        .ligand_dir(pick_path(&args.ligands, ws_file.ligands, &defaults.ligands))
        .results_dir(pick_path(&args.results, ws_file.results, &defaults.results))
        .ligand_extension(
            args.extension
                .clone()
                .or(ws_file.extension)
                .unwrap_or(defaults.extension),
        )
        .docking_program(
            args.docking_exe
                .clone()
                .or(tools_file.docking)
                .unwrap_or(defaults.docking_program),
        )
        .extraction_program(
            args.extract_exe
                .clone()
                .or(tools_file.extraction)
                .unwrap_or(defaults.extraction_program),
        )
        .docking_output_name(
            tools_file
                .docking_output
                .unwrap_or(defaults.docking_output_name),
        )
        .docking_log_name(tools_file.docking_log.unwrap_or(defaults.docking_log_name))
        .num_models(
            args.num_models
                .or(run_file.num_models)
                .unwrap_or(defaults.num_models),
        )
        .failure_policy(
            args.on_tool_failure
                .map(Into::into)
                .or(run_file.on_tool_failure)
                .unwrap_or_default(),
        )
        .resume_marker(
            args.resume_marker
                .map(Into::into)
                .or(run_file.resume_marker)
                .unwrap_or_default(),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        batch,
        dry_run: args.dry_run,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "workspace.root" => {
                workspace_section(&mut config).root = Some(PathBuf::from(value));
            }
            "workspace.receptor" => {
                workspace_section(&mut config).receptor = Some(PathBuf::from(value));
            }
            "workspace.site" => {
                workspace_section(&mut config).site = Some(PathBuf::from(value));
            }
            "workspace.ligands" => {
                workspace_section(&mut config).ligands = Some(PathBuf::from(value));
            }
            "workspace.results" => {
                workspace_section(&mut config).results = Some(PathBuf::from(value));
            }
            "workspace.extension" => {
                workspace_section(&mut config).extension = Some(value.to_string());
            }
            "tools.docking" => tools_section(&mut config).docking = Some(value.to_string()),
            "tools.extraction" => {
                tools_section(&mut config).extraction = Some(value.to_string());
            }
            "tools.docking-output" => {
                tools_section(&mut config).docking_output = Some(value.to_string());
            }
            "tools.docking-log" => {
                tools_section(&mut config).docking_log = Some(value.to_string());
            }
            "run.num-models" => {
                run_section(&mut config).num_models = Some(value.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value))
                })?);
            }
            "run.on-tool-failure" => {
                run_section(&mut config).on_tool_failure = Some(parse_enum(key, value)?);
            }
            "run.resume-marker" => {
                run_section(&mut config).resume_marker = Some(parse_enum(key, value)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn workspace_section(config: &mut FileConfig) -> &mut FileWorkspaceConfig {
    config.workspace.get_or_insert_with(Default::default)
}

fn tools_section(config: &mut FileConfig) -> &mut FileToolsConfig {
    config.tools.get_or_insert_with(Default::default)
}

fn run_section(config: &mut FileConfig) -> &mut FileRunConfig {
    config.run.get_or_insert_with(Default::default)
}

fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    T::deserialize(value.into_deserializer()).map_err(|e: serde::de::value::Error| {
        CliError::Config(format!("Invalid value for {}: {}", key, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ligdock::engine::config::{FailurePolicy, ResumeMarker};
    use std::fs;
    use tempfile::tempdir;

    fn args() -> RunArgs {
        RunArgs::default()
    }

    #[test]
    fn defaults_are_derived_from_launch_dir() {
        let app = build_config(&args(), Path::new("/runs/screen1")).unwrap();
        let ws = &app.batch.workspace;

        assert_eq!(ws.root(), Path::new("/runs/screen1"));
        assert_eq!(ws.receptor(), Path::new("/runs/screen1/receptor.pdb"));
        assert_eq!(ws.site(), Path::new("/runs/screen1/site.txt"));
        assert_eq!(ws.ligand_dir(), Path::new("/runs/screen1/Ligands"));
        assert_eq!(ws.results_dir(), Path::new("/runs/screen1/Results"));
        assert_eq!(app.batch.tools.docking_program, "hdock");
        assert_eq!(app.batch.tools.extraction_program, "createpl");
        assert_eq!(app.batch.num_models, 10);
        assert_eq!(app.batch.failure_policy, FailurePolicy::Abort);
        assert_eq!(app.batch.resume_marker, ResumeMarker::DockingOutput);
        assert!(!app.dry_run);
    }

    #[test]
    fn cli_overrides_file_which_overrides_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("ligdock.toml");
        fs::write(
            &config_path,
            "[workspace]\nreceptor = \"file_R.pdb\"\nsite = \"file_S.txt\"\n\n[run]\nnum-models = 4\non-tool-failure = \"continue\"\n",
        )
        .unwrap();

        let mut args = args();
        args.config = Some(config_path);
        args.receptor = Some(PathBuf::from("cli_R.pdb"));
        args.num_models = Some(7);

        let app = build_config(&args, dir.path()).unwrap();

        assert_eq!(app.batch.workspace.receptor(), dir.path().join("cli_R.pdb"));
        assert_eq!(app.batch.workspace.site(), dir.path().join("file_S.txt"));
        assert_eq!(app.batch.num_models, 7);
        assert_eq!(app.batch.failure_policy, FailurePolicy::Continue);
        assert_eq!(app.batch.workspace.ligand_dir(), dir.path().join("Ligands"));
    }

    #[test]
    fn file_root_is_relative_to_config_location() {
        let dir = tempdir().unwrap();
        let conf_dir = dir.path().join("conf");
        fs::create_dir(&conf_dir).unwrap();
        let config_path = conf_dir.join("ligdock.toml");
        fs::write(&config_path, "[workspace]\nroot = \"../screen\"\n").unwrap();

        let mut args = args();
        args.config = Some(config_path);

        let app = build_config(&args, Path::new("/elsewhere")).unwrap();

        assert_eq!(app.batch.workspace.root(), conf_dir.join("../screen"));
    }

    #[test]
    fn cli_workspace_is_relative_to_launch_dir() {
        let mut args = args();
        args.workspace = Some(PathBuf::from("screen"));

        let app = build_config(&args, Path::new("/runs")).unwrap();

        assert_eq!(app.batch.workspace.root(), Path::new("/runs/screen"));
    }

    #[test]
    fn set_values_override_file_entries() {
        let mut args = args();
        args.set_values = vec![
            "run.num-models=3".to_string(),
            "run.resume-marker=sentinel".to_string(),
            "tools.docking=/opt/hdock".to_string(),
            "workspace.results=Out".to_string(),
        ];

        let app = build_config(&args, Path::new("/w")).unwrap();

        assert_eq!(app.batch.num_models, 3);
        assert_eq!(app.batch.resume_marker, ResumeMarker::Sentinel);
        assert_eq!(app.batch.tools.docking_program, "/opt/hdock");
        assert_eq!(app.batch.workspace.results_dir(), Path::new("/w/Out"));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["run.num-models", "run.num-models=many", "nope.key=1", "run.on-tool-failure=retry"] {
            let mut args = args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, Path::new("/w")), Err(CliError::Config(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn invalid_core_values_surface_as_config_errors() {
        let mut args = args();
        args.num_models = Some(0);

        let result = build_config(&args, Path::new("/w"));

        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("num_models")));
    }

    #[test]
    fn dry_run_flag_is_carried_through() {
        let mut args = args();
        args.dry_run = true;
        assert!(build_config(&args, Path::new("/w")).unwrap().dry_run);
    }
}
