use wpbridge_archive::{HandlerEvent, Reporter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidatorEvent {
    Start,
    Complete,
    Error { error: String },
}

impl ValidatorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "import_validation_start",
            Self::Complete => "import_validation_complete",
            Self::Error { .. } => "import_validation_error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImporterEvent {
    Start,
    DatabaseStart,
    DatabaseComplete,
    WpContentStart,
    WpContentComplete,
    MetaStart,
    MetaComplete,
    Complete,
    Error { error: String },
}

impl ImporterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "import_start",
            Self::DatabaseStart => "import_database_start",
            Self::DatabaseComplete => "import_database_complete",
            Self::WpContentStart => "import_wp_content_start",
            Self::WpContentComplete => "import_wp_content_complete",
            Self::MetaStart => "import_meta_start",
            Self::MetaComplete => "import_meta_complete",
            Self::Complete => "import_complete",
            Self::Error { .. } => "import_error",
        }
    }
}

/// Every event an import attempt can produce, in one namespace.
#[derive(Clone, Debug, PartialEq)]
pub enum ImportEvent {
    Handler(HandlerEvent),
    Validator(ValidatorEvent),
    Importer(ImporterEvent),
}

impl ImportEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Handler(e) => e.name(),
            Self::Validator(e) => e.name(),
            Self::Importer(e) => e.name(),
        }
    }

    /// Fractional progress, for the events that carry one.
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Handler(HandlerEvent::Progress { progress }) => Some(*progress),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Handler(HandlerEvent::Error { error })
            | Self::Validator(ValidatorEvent::Error { error })
            | Self::Importer(ImporterEvent::Error { error }) => Some(error),
            _ => None,
        }
    }
}

pub type EventSink = Reporter<ImportEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_share_one_namespace() {
        let events = [
            ImportEvent::Handler(HandlerEvent::Start),
            ImportEvent::Validator(ValidatorEvent::Complete),
            ImportEvent::Importer(ImporterEvent::WpContentStart),
            ImportEvent::Importer(ImporterEvent::Error {
                error: "boom".into(),
            }),
        ];
        let names: Vec<_> = events.iter().map(ImportEvent::name).collect();
        assert_eq!(
            names,
            [
                "backup_extract_start",
                "import_validation_complete",
                "import_wp_content_start",
                "import_error"
            ]
        );
        assert_eq!(events[3].error(), Some("boom"));
    }

    #[test]
    fn test_progress_only_on_handler_progress() {
        let p = ImportEvent::Handler(HandlerEvent::Progress { progress: 0.5 });
        assert_eq!(p.progress(), Some(0.5));
        assert_eq!(ImportEvent::Importer(ImporterEvent::Start).progress(), None);
    }
}
