use std::fmt;

use crate::import::{
    Importer, JetpackImporter, LocalImporter, PlaygroundImporter, SqlImporter, WpressImporter,
};
use crate::validate::{
    BackupValidator, JetpackValidator, LocalValidator, PlaygroundValidator, SqlValidator,
    WpressValidator,
};

/// The producer-specific layout of a backup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavor {
    Jetpack,
    Local,
    Playground,
    Sql,
    Wpress,
}

impl Flavor {
    /// Detection order. The first flavor whose validator accepts a listing wins.
    pub const PRIORITY: [Flavor; 5] = [
        Self::Jetpack,
        Self::Local,
        Self::Playground,
        Self::Sql,
        Self::Wpress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Jetpack => "jetpack",
            Self::Local => "local",
            Self::Playground => "playground",
            Self::Sql => "sql",
            Self::Wpress => "wpress",
        }
    }

    pub fn validator(self) -> &'static dyn BackupValidator {
        match self {
            Self::Jetpack => &JetpackValidator,
            Self::Local => &LocalValidator,
            Self::Playground => &PlaygroundValidator,
            Self::Sql => &SqlValidator,
            Self::Wpress => &WpressValidator,
        }
    }

    pub fn importer(self) -> Box<dyn Importer> {
        match self {
            Self::Jetpack => Box::new(JetpackImporter),
            Self::Local => Box::new(LocalImporter),
            Self::Playground => Box::new(PlaygroundImporter),
            Self::Sql => Box::new(SqlImporter),
            Self::Wpress => Box::new(WpressImporter),
        }
    }

    /// First flavor, in [`Flavor::PRIORITY`] order, that recognizes `files`.
    pub fn detect(files: &[String]) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|flavor| flavor.validator().can_handle(files))
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_each_flavor() {
        let jetpack = files(&[
            "sql/wp_options.sql",
            "wp-content/uploads/a.jpg",
            "wp-content/plugins/p/p.php",
            "wp-content/themes/t/style.css",
        ]);
        let local = files(&[
            "app/sql/local.sql",
            "app/public/wp-content/uploads/a.jpg",
            "app/public/wp-content/plugins/p/p.php",
            "app/public/wp-content/themes/t/style.css",
        ]);
        let playground = files(&[
            "wp-content/database/playground.ht.sqlite",
            "wp-content/themes/t/style.css",
        ]);
        let wpress = files(&["package.json", "database.sql", "plugins/p/p.php"]);

        assert_eq!(Flavor::detect(&jetpack), Some(Flavor::Jetpack));
        assert_eq!(Flavor::detect(&local), Some(Flavor::Local));
        assert_eq!(Flavor::detect(&playground), Some(Flavor::Playground));
        assert_eq!(Flavor::detect(&files(&["dump.sql"])), Some(Flavor::Sql));
        assert_eq!(Flavor::detect(&wpress), Some(Flavor::Wpress));
        assert_eq!(Flavor::detect(&files(&["random.txt"])), None);
    }

    #[test]
    fn test_importer_matches_flavor() {
        for flavor in Flavor::PRIORITY {
            assert_eq!(flavor.importer().flavor(), flavor);
        }
    }
}
