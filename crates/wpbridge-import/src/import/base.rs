use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};
use wpbridge_fs::{copy_file, remove_file_if_exists};
use wpbridge_platform::CommandOptions;

use super::{ImportContext, Importer};
use crate::content::{BackupContents, MetaFileData};
use crate::error::{Error, Result};
use crate::events::ImporterEvent;
use crate::meta::MetaFormat;

/// Entries of `wp-content` that belong to the local runtime, not the site.
const PRESERVED: [&str; 3] = ["mu-plugins", "database", "db.php"];

/// Well-known paths inside a target site.
#[derive(Clone, Debug)]
pub struct SiteLayout {
    root: PathBuf,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wp_content(&self) -> PathBuf {
        self.root.join("wp-content")
    }

    pub fn database_dir(&self) -> PathBuf {
        self.wp_content().join("database")
    }

    pub fn database_file(&self) -> PathBuf {
        self.database_dir().join(".ht.sqlite")
    }

    pub fn wp_config(&self) -> PathBuf {
        self.root.join("wp-config.php")
    }
}

/// `wpbridge-import-<unix-millis>-<n>.sql`
pub fn staged_sql_name(n: usize) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("wpbridge-import-{millis}-{n}.sql")
}

/// Wrap an importer run in `Start` and its terminal event.
pub(crate) async fn report<T, F>(ctx: &ImportContext<'_>, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    ctx.events.emit(ImporterEvent::Start);
    match work.await {
        Ok(value) => {
            ctx.events.emit(ImporterEvent::Complete);
            Ok(value)
        }
        Err(e) => {
            ctx.events.emit(ImporterEvent::Error {
                error: e.to_string(),
            });
            Err(e)
        }
    }
}

/// The shared import flow. Returns the parsed meta file, if any.
pub(crate) async fn run<I: Importer + ?Sized>(
    importer: &I,
    ctx: &ImportContext<'_>,
    contents: &BackupContents,
) -> Result<Option<MetaFileData>> {
    let site = ctx.site();
    info!(site = %site.root().display(), flavor = %importer.flavor(), "importing backup");

    backup_existing_site(ctx, &site).await?;
    create_empty_database(&site).await?;
    copy_wp_config(&site, contents).await?;

    ctx.events.emit(ImporterEvent::WpContentStart);
    copy_wp_content(&site, contents).await?;
    ctx.events.emit(ImporterEvent::WpContentComplete);

    ctx.events.emit(ImporterEvent::MetaStart);
    let meta = read_meta(importer.meta_format(), contents.meta_file.as_deref()).await;
    ctx.events.emit(ImporterEvent::MetaComplete);

    ctx.events.emit(ImporterEvent::DatabaseStart);
    importer.import_database(ctx, contents, meta.as_ref()).await?;
    ctx.events.emit(ImporterEvent::DatabaseComplete);

    Ok(meta)
}

/// Move the current database and non-runtime `wp-content` entries to the trash.
async fn backup_existing_site(ctx: &ImportContext<'_>, site: &SiteLayout) -> Result<()> {
    ctx.trash.trash(&site.database_file()).await?;

    let wp_content = site.wp_content();
    let mut entries = match tokio::fs::read_dir(&wp_content).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(wp_content, e)),
    };
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io(&wp_content, e))?
    {
        let name = entry.file_name();
        if PRESERVED.iter().any(|keep| name == *keep) {
            continue;
        }
        ctx.trash.trash(&entry.path()).await?;
    }
    Ok(())
}

async fn create_empty_database(site: &SiteLayout) -> Result<()> {
    let dir = site.database_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::io(&dir, e))?;
    let file = site.database_file();
    tokio::fs::write(&file, b"")
        .await
        .map_err(|e| Error::io(&file, e))
}

async fn copy_wp_config(site: &SiteLayout, contents: &BackupContents) -> Result<()> {
    if let Some(config) = &contents.wp_config {
        copy_file(config, &site.wp_config()).await?;
    }
    Ok(())
}

/// Copy regular files from the content buckets into the site, keeping their layout.
async fn copy_wp_content(site: &SiteLayout, contents: &BackupContents) -> Result<()> {
    let source_root = contents
        .extraction_directory
        .join(&contents.wp_content_directory);
    let dest_root = site.wp_content();

    let mut copied = 0usize;
    for path in contents.wp_content.iter() {
        let meta = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "content entry was not extracted, skipping");
                continue;
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        if !meta.is_file() {
            debug!(path = %path.display(), "skipping non-regular content entry");
            continue;
        }
        let Ok(rel) = path.strip_prefix(&source_root) else {
            warn!(path = %path.display(), "content outside the wp-content root, skipping");
            continue;
        };
        copy_file(path, &dest_root.join(rel)).await?;
        copied += 1;
    }
    debug!(files = copied, "copied wp-content");
    Ok(())
}

/// Parse the meta file, treating any failure as "no meta".
async fn read_meta(format: Option<MetaFormat>, path: Option<&Path>) -> Option<MetaFileData> {
    let (format, path) = (format?, path?);
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read meta file, ignoring it");
            return None;
        }
    };
    match format.parse(&raw) {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not parse meta file, ignoring it");
            None
        }
    }
}

/// Import `files` one after another through the site runtime.
///
/// Each file is staged into the site root under a generated name and the
/// staged copy is removed whatever the outcome.
pub async fn import_sql_files<I: Importer + ?Sized>(
    importer: &I,
    ctx: &ImportContext<'_>,
    files: &[PathBuf],
) -> Result<()> {
    let root = ctx.runtime.site_path();
    for (n, file) in files.iter().enumerate() {
        let name = staged_sql_name(n);
        let staged = root.join(&name);

        let outcome = import_one(importer, ctx, file, &staged, &name).await;
        if let Err(e) = remove_file_if_exists(&staged).await {
            warn!(path = %staged.display(), error = %e, "failed to remove staged SQL file");
        }
        outcome?;
    }
    Ok(())
}

async fn import_one<I: Importer + ?Sized>(
    importer: &I,
    ctx: &ImportContext<'_>,
    file: &Path,
    staged: &Path,
    name: &str,
) -> Result<()> {
    copy_file(file, staged).await?;
    importer.prepare_sql_file(ctx, staged).await?;

    let args = [
        "sqlite".to_owned(),
        "import".to_owned(),
        name.to_owned(),
        format!("--require={}", ctx.config.sqlite_command.display()),
    ];
    let opts = CommandOptions::with_php(ctx.config.db_import_php_version.clone());
    let out = ctx.runtime.execute_command(&args, opts).await?;

    if !out.success() {
        return Err(Error::DatabaseImport {
            file: file.to_path_buf(),
            exit_code: out.exit_code,
            stderr: out.stderr.trim().to_owned(),
        });
    }
    if !out.stderr.trim().is_empty() {
        warn!(
            file = %file.display(),
            stderr = %out.stderr.trim(),
            "database import reported warnings"
        );
    }
    info!(file = %file.display(), "imported database file");
    Ok(())
}

/// Point the imported site at `http://<site_host>:<port>`.
///
/// Skipped when the stored URL is empty or already correct.
pub async fn rewrite_site_url(ctx: &ImportContext<'_>) -> Result<()> {
    let new_url = ctx.config.site_url(ctx.runtime.port());

    let args = ["option".to_owned(), "get".to_owned(), "siteurl".to_owned()];
    let out = ctx
        .runtime
        .execute_command(&args, CommandOptions::default())
        .await?;
    if !out.success() {
        return Err(Error::SiteUrl {
            reason: format!(
                "reading siteurl exited with {}: {}",
                out.exit_code,
                out.stderr.trim()
            ),
        });
    }

    let old_url = out.stdout.trim();
    if old_url.is_empty() || old_url == new_url {
        debug!(url = old_url, "site URL needs no rewrite");
        return Ok(());
    }

    let args = [
        "search-replace".to_owned(),
        old_url.to_owned(),
        new_url.clone(),
    ];
    let out = ctx
        .runtime
        .execute_command(&args, CommandOptions::default())
        .await?;
    if !out.success() {
        return Err(Error::SiteUrl {
            reason: format!(
                "search-replace exited with {}: {}",
                out.exit_code,
                out.stderr.trim()
            ),
        });
    }
    info!(from = old_url, to = %new_url, "rewrote site URL");
    Ok(())
}
