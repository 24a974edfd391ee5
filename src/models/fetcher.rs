use crate::core::errors::{ClassifierError, Result};
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

const SNIFF_LEN: u64 = 512;
const HTML_MARKERS: [&[u8]; 2] = [b"<!doctype", b"<html"];

/// Retrieves a remote artifact into a local file.
pub trait ArtifactFetcher: Send + Sync {
    /// Downloads `url` to `dest`, returning the number of bytes written.
    /// `dest` must either be left untouched or hold the complete artifact.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Blocking HTTP(S) fetcher.
///
/// File hosts such as Google Drive answer large downloads with an HTML
/// confirmation page. One confirmation hop is followed; any other HTML
/// response is refused and never reaches `dest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tumorscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClassifierError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| unavailable(url, e.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(
                url,
                format!("server responded with {}", response.status()),
            ));
        }
        Ok(response)
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        tracing::info!(%url, dest = %dest.display(), "downloading model artifact");
        let mut response = self.get(url)?;

        if is_html(&response) {
            let page = response
                .text()
                .map_err(|e| unavailable(url, format!("transfer interrupted: {e}")))?;
            let Some(next) = confirmation_url(url, &page) else {
                return Err(unavailable(url, "server returned an HTML page, not the artifact".into()));
            };
            tracing::info!(url = %next, "following download confirmation");
            response = self.get(&next)?;
            if is_html(&response) {
                return Err(unavailable(
                    url,
                    "download confirmation led to another HTML page".into(),
                ));
            }
        }

        let expected = response.content_length();
        if let Some(total) = expected {
            tracing::info!("artifact size: {} bytes ({} MB)", total, total / 1024 / 1024);
        }

        let mut staged = staging_file_for(dest)?;
        let written = response
            .copy_to(staged.as_file_mut())
            .map_err(|e| unavailable(url, format!("transfer interrupted: {e}")))?;

        if let Some(total) = expected
            && written != total
        {
            return Err(unavailable(
                url,
                format!("download incomplete: got {written} bytes, expected {total}"),
            ));
        }
        if written == 0 {
            return Err(unavailable(url, "server returned an empty body".into()));
        }

        staged.as_file_mut().flush()?;
        if looks_like_html(&read_head(staged.reopen()?)?) {
            return Err(unavailable(url, "body is an HTML page, not the artifact".into()));
        }
        staged.as_file().sync_all()?;
        staged.persist(dest).map_err(|e| e.error)?;

        tracing::info!(bytes = written, "download complete");
        Ok(written)
    }
}

fn unavailable(url: &str, reason: String) -> ClassifierError {
    ClassifierError::ModelUnavailable {
        url: url.to_string(),
        reason,
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
}

/// First bytes of `file`, enough to tell a web page from a binary artifact.
pub(crate) fn read_head(file: File) -> Result<Vec<u8>> {
    let mut head = Vec::new();
    file.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(head)
}

pub(crate) fn looks_like_html(head: &[u8]) -> bool {
    let head = head.trim_ascii_start();
    HTML_MARKERS
        .iter()
        .any(|marker| head.len() >= marker.len() && head[..marker.len()].eq_ignore_ascii_case(marker))
}

/// Where a download-confirmation page points next. Understands the form
/// variant (`action` plus hidden inputs, one of them `confirm`) and the older
/// link variant carrying a `confirm=<token>` query parameter.
fn confirmation_url(url: &str, page: &str) -> Option<String> {
    if let Some(next) = confirmation_form(page) {
        return Some(next);
    }
    let token = confirm_token(page)?;
    let mut next = reqwest::Url::parse(url).ok()?;
    next.query_pairs_mut().append_pair("confirm", token);
    Some(next.to_string())
}

fn confirmation_form(page: &str) -> Option<String> {
    let start = page.find("<form")?;
    let end = page[start..].find("</form>").map_or(page.len(), |e| start + e);
    let form = &page[start..end];
    let action = attribute(&form[..form.find('>')?], "action")?.replace("&amp;", "&");

    let params: Vec<(&str, &str)> = form
        .split("<input")
        .skip(1)
        .filter_map(|input| {
            let tag = &input[..input.find('>')?];
            Some((attribute(tag, "name")?, attribute(tag, "value")?))
        })
        .collect();
    if !params.iter().any(|(name, _)| *name == "confirm") {
        return None;
    }
    reqwest::Url::parse_with_params(&action, &params)
        .ok()
        .map(|u| u.to_string())
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn confirm_token(page: &str) -> Option<&str> {
    let start = page.find("confirm=")? + "confirm=".len();
    let rest = &page[start..];
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    (len > 0).then(|| &rest[..len])
}

/// Temp file next to `dest`, so the final rename stays on one filesystem.
pub(crate) fn staging_file_for(dest: &Path) -> Result<NamedTempFile> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    Ok(NamedTempFile::new_in(dir)?)
}
