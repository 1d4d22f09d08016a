//! The parameter catalogue: every quantity the observations API measures.

use std::collections::BTreeMap;
use std::io::{self, Write};

use thiserror::Error;
use tracing::{error, info, warn};
use xmltree::{Element, XMLNode};

use crate::{FetchError, SmhiApi, model::Parameter};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Why a single feed entry was left out of the catalogue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry has no title")]
    MissingTitle,

    #[error("entry has no summary")]
    MissingSummary,

    #[error("entry has no application/json link")]
    MissingLink,

    #[error("cannot derive a parameter id from '{0}'")]
    InvalidId(String),
}

/// Parse the Atom feed served at `/parameter/` into `id -> "<title> (<summary>)"`.
///
/// Entries that cannot be read are skipped with a warning and the rest of the
/// feed is kept. A document that is not well-formed XML is an error.
pub fn parse_parameters(xml: &str) -> Result<BTreeMap<u32, String>, FetchError> {
    let root = Element::parse(xml.as_bytes())?;

    let mut parameters = BTreeMap::new();
    for node in &root.children {
        let XMLNode::Element(entry) = node else {
            continue;
        };
        if entry.name != "entry" {
            continue;
        }

        match parse_entry(entry) {
            Ok(parameter) => {
                parameters.insert(parameter.id, parameter.label);
            }
            Err(reason) => warn!(%reason, "skipping catalogue entry"),
        }
    }

    Ok(parameters)
}

fn parse_entry(entry: &Element) -> Result<Parameter, EntryError> {
    let title = child_text(entry, "title").ok_or(EntryError::MissingTitle)?;
    let summary = child_text(entry, "summary").ok_or(EntryError::MissingSummary)?;

    let href = entry
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(el) if el.name == "link" => Some(el),
            _ => None,
        })
        .find(|link| link.attributes.get("type").map(String::as_str) == Some(JSON_MEDIA_TYPE))
        .and_then(|link| link.attributes.get("href"))
        .ok_or(EntryError::MissingLink)?;

    let id = id_from_href(href).ok_or_else(|| EntryError::InvalidId(href.clone()))?;

    Ok(Parameter { id, label: format!("{title} ({summary})") })
}

fn child_text(element: &Element, name: &str) -> Option<String> {
    element
        .get_child(name)
        .map(|child| child.get_text().map(|t| t.trim().to_string()).unwrap_or_default())
}

/// `.../parameter/2.json` -> `2`
fn id_from_href(href: &str) -> Option<u32> {
    let segment = href.trim_end_matches('/').rsplit('/').next()?;
    let stem = segment.split_once('.').map_or(segment, |(stem, _)| stem);
    stem.parse().ok()
}

/// One `"<id>. <label>"` line per parameter, ascending id.
pub fn write_parameters<W: Write>(out: &mut W, parameters: &BTreeMap<u32, String>) -> io::Result<()> {
    for (id, label) in parameters {
        writeln!(out, "{id}. {label}")?;
    }
    Ok(())
}

impl SmhiApi {
    pub async fn try_fetch_parameters(&self) -> Result<BTreeMap<u32, String>, FetchError> {
        let url = self.config.parameters_url();
        let xml = self.source.get_text(&url).await?;
        let parameters = parse_parameters(&xml)?;

        info!(count = parameters.len(), "parsed parameter catalogue");
        Ok(parameters)
    }

    /// The parameter catalogue, or an empty map if it could not be fetched.
    pub async fn fetch_parameters(&self) -> BTreeMap<u32, String> {
        self.try_fetch_parameters().await.unwrap_or_else(|err| {
            error!(error = %err.report(), "failed to fetch parameter catalogue");
            BTreeMap::new()
        })
    }

    pub async fn display_parameters<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.try_fetch_parameters().await {
            Ok(parameters) => write_parameters(out, &parameters),
            Err(err) => {
                error!(error = %err.report(), "failed to fetch parameter catalogue");
                writeln!(out, "Failed to retrieve data from the SMHI API.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, source::fake::FakeSource};
    use reqwest::StatusCode;

    const FEED: &str = include_str!("../tests/fixtures/parameters.xml");
    const BASE: &str = "http://smhi.test/api";

    fn api(source: FakeSource) -> SmhiApi {
        SmhiApi::with_source(Config::default().with_base_url(BASE), Box::new(source))
    }

    fn entry(title: &str, summary: &str, href: &str) -> String {
        format!(
            r#"<entry><title>{title}</title><link href="{href}" type="application/json"/><summary>{summary}</summary></entry>"#
        )
    }

    fn feed(entries: &[String]) -> String {
        format!(r#"<feed xmlns="http://www.w3.org/2005/Atom">{}</feed>"#, entries.concat())
    }

    #[test]
    fn parses_fixture_in_ascending_id_order() {
        let parameters = parse_parameters(FEED).unwrap();

        let expected: Vec<(u32, &str)> = vec![
            (11, "Global Irradians (svenska stationer) (medelvärde 1 timma, varje timme)"),
            (21, "Byvind (max, 1 gång/tim)"),
            (22, "Lufttemperatur (medel, 1 gång per månad)"),
            (39, "Daggpunktstemperatur (momentanvärde, 1 gång/tim)"),
        ];
        let actual: Vec<(u32, &str)> =
            parameters.iter().map(|(id, label)| (*id, label.as_str())).collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn only_the_json_link_decides_the_id() {
        let xml = feed(&[r#"<entry><title>T</title><summary>S</summary>
               <link href="http://h/parameter/99.atom" type="application/atom+xml"/>
               <link href="http://h/parameter/7.json" type="application/json"/></entry>"#
            .to_string()]);

        let parameters = parse_parameters(&xml).unwrap();
        assert_eq!(parameters.keys().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn bad_entries_are_skipped_and_the_rest_kept() {
        let xml = feed(&[
            entry("Vindriktning", "medelvärde 10 min, 1 gång/tim", "http://h/parameter/3.json"),
            entry("Trasig", "ingen siffra", "http://h/parameter/abc.json"),
            r#"<entry><title>Utan länk</title><summary>x</summary></entry>"#.to_string(),
            entry("Lufttemperatur", "momentanvärde, 1 gång/tim", "http://h/parameter/1.json"),
        ]);

        let parameters = parse_parameters(&xml).unwrap();

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[&1], "Lufttemperatur (momentanvärde, 1 gång/tim)");
        assert_eq!(parameters[&3], "Vindriktning (medelvärde 10 min, 1 gång/tim)");
    }

    #[test]
    fn entry_errors_name_the_problem() {
        let xml = r#"<entry><title>T</title><link href="http://h/parameter/x.json" type="application/json"/></entry>"#;
        let el = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(parse_entry(&el), Err(EntryError::MissingSummary));

        let xml = r#"<entry><title>T</title><summary>S</summary><link href="http://h/parameter/x.json" type="application/json"/></entry>"#;
        let el = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(parse_entry(&el), Err(EntryError::InvalidId("http://h/parameter/x.json".into())));
    }

    #[test]
    fn duplicate_ids_keep_the_last_entry() {
        let xml = feed(&[
            entry("Första", "a", "http://h/parameter/5.json"),
            entry("Andra", "b", "http://h/parameter/5.json"),
        ]);

        let parameters = parse_parameters(&xml).unwrap();
        assert_eq!(parameters[&5], "Andra (b)");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = parse_parameters("<feed><entry></feed>").unwrap_err();
        assert!(matches!(err, FetchError::Xml(_)));
    }

    #[test]
    fn id_from_href_strips_extension() {
        assert_eq!(id_from_href("https://h/api/parameter/2.json"), Some(2));
        assert_eq!(id_from_href("parameter/40"), Some(40));
        assert_eq!(id_from_href("https://h/api/parameter/two.json"), None);
        assert_eq!(id_from_href(""), None);
    }

    #[tokio::test]
    async fn display_prints_one_line_per_parameter() {
        let source = FakeSource::new().ok(format!("{BASE}/parameter/"), FEED);
        let mut out = Vec::new();

        api(source).display_parameters(&mut out).await.unwrap();

        let expected = "11. Global Irradians (svenska stationer) (medelvärde 1 timma, varje timme)\n\
                        21. Byvind (max, 1 gång/tim)\n\
                        22. Lufttemperatur (medel, 1 gång per månad)\n\
                        39. Daggpunktstemperatur (momentanvärde, 1 gång/tim)\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn non_200_yields_empty_catalogue() {
        let source = FakeSource::new().status(format!("{BASE}/parameter/"), StatusCode::NOT_FOUND);
        let api = api(source);

        let err = api.try_fetch_parameters().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(api.fetch_parameters().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_feed_yields_empty_catalogue() {
        let source = FakeSource::new().ok(format!("{BASE}/parameter/"), "<xml>Test Data");

        assert!(api(source).fetch_parameters().await.is_empty());
    }

    #[tokio::test]
    async fn display_reports_fetch_failure() {
        let source = FakeSource::new().status(
            format!("{BASE}/parameter/"),
            StatusCode::SERVICE_UNAVAILABLE,
        );
        let mut out = Vec::new();

        api(source).display_parameters(&mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Failed to retrieve data from the SMHI API.\n");
    }
}
