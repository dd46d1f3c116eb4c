//! SQL text rewriting for wpress dumps.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

use crate::error::{Error, Result};

/// Table prefix placeholder written by the wpress exporter.
pub const PREFIX_PLACEHOLDER: &str = "SERVMASK_PREFIX";

fn replace_all(line: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        if line[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(line[i]);
            i += 1;
        }
    }
    out
}

/// Replace every [`PREFIX_PLACEHOLDER`] in `text`, keeping lines and line endings intact.
pub fn replace_prefix(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| line.replace(PREFIX_PLACEHOLDER, prefix))
        .collect()
}

/// Stream `path` line by line through [`PREFIX_PLACEHOLDER`] replacement, in place.
///
/// Works on bytes so dumps with non-UTF-8 payloads survive untouched.
pub async fn rewrite_table_prefix(path: &Path, prefix: &str) -> Result<()> {
    let tmp = rewritten_path(path);
    let input = File::open(path).await.map_err(|e| Error::io(path, e))?;
    let output = File::create(&tmp).await.map_err(|e| Error::io(&tmp, e))?;

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        let rewritten = replace_all(&line, PREFIX_PLACEHOLDER.as_bytes(), prefix.as_bytes());
        writer
            .write_all(&rewritten)
            .await
            .map_err(|e| Error::io(&tmp, e))?;
    }
    writer.flush().await.map_err(|e| Error::io(&tmp, e))?;
    drop(writer);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| Error::io(path, e))
}

fn rewritten_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".rewrite");
    path.with_file_name(name)
}

/// PHP `serialize()` output for a list of strings.
///
/// `["a.php"]` becomes `a:1:{i:0;s:5:"a.php";}`. Lengths count bytes.
pub fn serialize_php_list(items: &[String]) -> String {
    let mut out = format!("a:{}:{{", items.len());
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("i:{i};s:{}:\"{item}\";", item.len()));
    }
    out.push('}');
    out
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn update_option(prefix: &str, name: &str, value: &str) -> String {
    format!(
        "UPDATE `{prefix}_options` SET `option_value` = {} WHERE `option_name` = {};\n",
        quote(value),
        quote(name)
    )
}

/// Statements activating the exported theme, or `None` when the meta file names none.
pub fn theme_sql(
    prefix: &str,
    template: Option<&str>,
    stylesheet: Option<&str>,
) -> Option<String> {
    let mut sql = String::new();
    if let Some(template) = template {
        sql.push_str(&update_option(prefix, "template", template));
    }
    if let Some(stylesheet) = stylesheet {
        sql.push_str(&update_option(prefix, "stylesheet", stylesheet));
    }
    (!sql.is_empty()).then_some(sql)
}

/// Statement activating the exported plugins, or `None` when there are none.
pub fn plugins_sql(prefix: &str, plugins: &[String]) -> Option<String> {
    if plugins.is_empty() {
        return None;
    }
    Some(update_option(
        prefix,
        "active_plugins",
        &serialize_php_list(plugins),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_prefix_preserves_lines() {
        let sql = "CREATE TABLE `SERVMASK_PREFIX_posts` (id int);\n\
                   INSERT INTO `SERVMASK_PREFIX_options` VALUES ('SERVMASK_PREFIX_user_roles');\n\
                   -- done\n";
        assert_eq!(
            replace_prefix(sql, "wp"),
            "CREATE TABLE `wp_posts` (id int);\n\
             INSERT INTO `wp_options` VALUES ('wp_user_roles');\n\
             -- done\n"
        );
    }

    #[test]
    fn test_replace_prefix_without_trailing_newline() {
        assert_eq!(replace_prefix("a\r\nSERVMASK_PREFIX", "wp"), "a\r\nwp");
    }

    #[tokio::test]
    async fn test_rewrite_table_prefix_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.sql");
        let mut raw = b"DROP TABLE IF EXISTS `SERVMASK_PREFIX_posts`;\n".to_vec();
        raw.extend_from_slice(b"INSERT INTO `SERVMASK_PREFIX_posts` VALUES (X'\xff\xfe');\n");
        tokio::fs::write(&path, &raw).await.unwrap();

        rewrite_table_prefix(&path, "wp").await.unwrap();

        let mut expected = b"DROP TABLE IF EXISTS `wp_posts`;\n".to_vec();
        expected.extend_from_slice(b"INSERT INTO `wp_posts` VALUES (X'\xff\xfe');\n");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), expected);
        assert!(!rewritten_path(&path).exists());
    }

    #[test]
    fn test_serialize_php_list() {
        let plugins = vec!["akismet/akismet.php".to_owned(), "hello.php".to_owned()];
        assert_eq!(
            serialize_php_list(&plugins),
            r#"a:2:{i:0;s:19:"akismet/akismet.php";i:1;s:9:"hello.php";}"#
        );
        assert_eq!(serialize_php_list(&[]), "a:0:{}");
    }

    #[test]
    fn test_theme_sql() {
        assert_eq!(
            theme_sql("wp", Some("astra"), Some("o'brien")).unwrap(),
            "UPDATE `wp_options` SET `option_value` = 'astra' WHERE `option_name` = 'template';\n\
             UPDATE `wp_options` SET `option_value` = 'o''brien' WHERE `option_name` = 'stylesheet';\n"
        );
        assert_eq!(theme_sql("wp", None, None), None);
    }

    #[test]
    fn test_plugins_sql() {
        let sql = plugins_sql("wp", &["hello.php".to_owned()]).unwrap();
        assert_eq!(
            sql,
            "UPDATE `wp_options` SET `option_value` = 'a:1:{i:0;s:9:\"hello.php\";}' \
             WHERE `option_name` = 'active_plugins';\n"
        );
        assert_eq!(plugins_sql("wp", &[]), None);
    }
}
