use super::Importer;
use crate::flavor::Flavor;
use crate::meta::MetaFormat;

/// Jetpack backups run the shared flow unchanged.
pub struct JetpackImporter;

impl Importer for JetpackImporter {
    fn flavor(&self) -> Flavor {
        Flavor::Jetpack
    }

    fn meta_format(&self) -> Option<MetaFormat> {
        Some(MetaFormat::Studio)
    }
}

pub struct LocalImporter;

impl Importer for LocalImporter {
    fn flavor(&self) -> Flavor {
        Flavor::Local
    }

    fn meta_format(&self) -> Option<MetaFormat> {
        Some(MetaFormat::LocalSite)
    }
}
