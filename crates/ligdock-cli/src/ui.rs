use console::{StyledObject, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use ligdock::engine::progress::{Progress, ProgressCallback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    Info,
    Skip,
    Run,
    Ok,
    Error,
}

impl StatusTag {
    pub fn label(self) -> &'static str {
        match self {
            StatusTag::Info => "INFO",
            StatusTag::Skip => "SKIP",
            StatusTag::Run => "RUN",
            StatusTag::Ok => "OK",
            StatusTag::Error => "ERROR",
        }
    }

    fn styled(self) -> StyledObject<String> {
        let text = format!("[{}]", self.label());
        match self {
            StatusTag::Info => style(text).cyan(),
            StatusTag::Skip => style(text).yellow(),
            StatusTag::Run => style(text).blue(),
            StatusTag::Ok => style(text).green(),
            StatusTag::Error => style(text).red().bold(),
        }
    }
}

/// One human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tag: StatusTag,
    pub text: String,
}

impl StatusLine {
    pub fn new(tag: StatusTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {}", self.tag.styled(), self.text)
    }
}

pub fn describe(progress: &Progress) -> Option<StatusLine> {
    let line = match progress {
        Progress::BatchStart { total } => {
            StatusLine::new(StatusTag::Info, format!("Found {} ligand file(s).", total))
        }
        Progress::LigandStart { index, total, name } => StatusLine::new(
            StatusTag::Info,
            format!("({}/{}) Ligand '{}'", index + 1, total, name),
        ),
        Progress::Skipped { name, marker } => StatusLine::new(
            StatusTag::Skip,
            format!(
                "'{}' already processed ({} exists).",
                name,
                marker.display()
            ),
        ),
        Progress::Running { name, tool } => {
            StatusLine::new(StatusTag::Run, format!("Running {} for '{}'...", tool, name))
        }
        Progress::Succeeded { name } => {
            StatusLine::new(StatusTag::Ok, format!("'{}' docked and models extracted.", name))
        }
        Progress::Failed { name, reason } => {
            StatusLine::new(StatusTag::Error, format!("'{}': {}", name, reason))
        }
        Progress::BatchFinish => return None,
    };
    Some(line)
}

/// Prints status lines above a bar that counts finished ligands.
#[derive(Clone)]
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(show_bar: bool) -> Self {
        let bar = ProgressBar::new(0).with_style(Self::bar_style());
        bar.set_draw_target(if show_bar {
            ProgressDrawTarget::stderr_with_hz(12)
        } else {
            ProgressDrawTarget::hidden()
        });
        Self { bar }
    }

    pub fn print(&self, line: &StatusLine) {
        self.bar.suspend(|| println!("{}", line.render()));
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let this = self.clone();
        Box::new(move |progress: Progress| this.handle(progress))
    }

    fn handle(&self, progress: Progress) {
        match &progress {
            Progress::BatchStart { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
            }
            Progress::LigandStart { name, .. } => self.bar.set_message(name.clone()),
            Progress::Skipped { .. } | Progress::Succeeded { .. } | Progress::Failed { .. } => {
                self.bar.inc(1)
            }
            Progress::BatchFinish => self.bar.finish_and_clear(),
            Progress::Running { .. } => {}
        }
        if let Some(line) = describe(&progress) {
            self.print(&line);
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .expect("Invalid template")
            .progress_chars("━╸ ")
    }
}
