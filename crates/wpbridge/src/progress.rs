use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};
use wpbridge_import::{EventSink, ImportEvent};

const PB_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {percent:>3}% {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

/// Progress positions are permille of the extraction.
const SCALE: u64 = 1000;

static PB_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// Terminal view of one import: a bar for extraction and a line per phase event.
pub struct ImportProgress {
    pb: ProgressBar,
}

impl Default for ImportProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportProgress {
    pub fn new() -> Self {
        let pb = ProgressBar::new(SCALE);
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix("import");
        Self { pb }
    }

    pub fn sink(&self) -> EventSink {
        let pb = self.pb.clone();
        EventSink::new(move |event: ImportEvent| match event.progress() {
            Some(progress) => pb.set_position((progress * SCALE as f64) as u64),
            None => {
                let line = match event.error() {
                    Some(error) => format!("{}: {error}", event.name()),
                    None => event.name().to_owned(),
                };
                pb.println(&line);
                pb.set_message(line);
            }
        })
    }

    pub fn finish(self, ok: bool) {
        if ok {
            self.pb.set_position(SCALE);
            self.pb.finish_with_message("done");
        } else {
            self.pb.abandon_with_message("failed");
        }
    }
}
