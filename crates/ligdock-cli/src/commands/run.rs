use crate::cli::RunArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::ui::{BatchProgress, StatusLine, StatusTag};
use ligdock::{
    core::process::ProcessRunner,
    engine::progress::ProgressReporter,
    workflows::{self, batch::BatchSummary},
};
use tracing::info;

pub fn run(args: RunArgs, quiet: bool) -> Result<()> {
    let launch_dir = std::env::current_dir()?;
    info!("Resolving configuration relative to {:?}", &launch_dir);
    let app = build_config(&args, &launch_dir)?;

    if app.dry_run {
        return print_plan(&app);
    }

    let workspace = &app.batch.workspace;
    println!(
        "Docking ligands from {} against {}",
        workspace.ligand_dir().display(),
        workspace.receptor().display()
    );

    let show_bar = !quiet && console::Term::stderr().is_term();
    let progress = BatchProgress::new(show_bar);
    let reporter = ProgressReporter::with_callback(progress.get_callback());

    info!("Invoking the batch docking workflow...");
    let summary = workflows::batch::run(&app.batch, &ProcessRunner, &reporter)?;
    info!(
        "Workflow finished: {} ligand(s), {} failed.",
        summary.total(),
        summary.failed()
    );

    print_summary(&summary);
    Ok(())
}

fn print_plan(app: &AppConfig) -> Result<()> {
    let planned = workflows::batch::plan(&app.batch)?;
    println!("Dry run: {} ligand(s) discovered.", planned.len());

    for item in &planned {
        if item.already_done {
            println!(
                "{}",
                StatusLine::new(
                    StatusTag::Skip,
                    format!("'{}' already processed.", item.ligand.base_name)
                )
                .render()
            );
            continue;
        }
        println!(
            "{}",
            StatusLine::new(
                StatusTag::Run,
                format!("'{}' -> {}", item.ligand.base_name, item.layout.dir.display())
            )
            .render()
        );
        for invocation in [&item.docking, &item.extraction] {
            println!(
                "    (in {}) {}",
                invocation.working_dir().display(),
                invocation.command_line()
            );
        }
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\nProcessed {} ligand(s): {} completed, {} skipped, {} without docking output, {} failed.",
        summary.total(),
        summary.completed(),
        summary.skipped(),
        summary.no_output(),
        summary.failed()
    );
}
