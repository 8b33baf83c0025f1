//! Subcommand implementations
//!
//! Each command returns a report; `main` decides between text and JSON.

use anyhow::{bail, Context, Result};
use scriptorium_canon::{Canon, CanonPosition, ScriptureReference, Testament};
use scriptorium_completion::{ProviderKind, ProviderRegistry};
use scriptorium_study::{
    Commentary, JsonFileStore, StudyConfig, StudyPassage, StudySession,
};
use scriptorium_timeline::{BookMarker, Circle, CrossReference, TimelineLayout};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output of `resolve`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ResolveReport {
    pub(crate) reference: ScriptureReference,
    pub(crate) testament: Option<Testament>,
    pub(crate) position: CanonPosition,
}

impl ResolveReport {
    pub(crate) fn to_text(&self) -> String {
        let testament = self.testament.map_or("unknown", |t| t.as_str());
        format!(
            "{}\n  book:      {}\n  chapter:   {}\n  verse:     {}\n  testament: {}\n  position:  {}",
            self.reference,
            self.reference.book,
            self.reference.chapter,
            self.reference.verse,
            testament,
            self.position
        )
    }
}

pub(crate) fn resolve(reference: &str, canon: &Canon) -> Result<ResolveReport> {
    let resolved = canon
        .parse(reference)
        .with_context(|| format!("cannot resolve '{reference}'"))?;
    Ok(ResolveReport {
        testament: canon.testament(&resolved.book),
        position: canon.position_of(&resolved),
        reference: resolved,
    })
}

/// Output of `timeline`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TimelineReport {
    #[serde(flatten)]
    pub(crate) layout: TimelineLayout,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) markers: Vec<BookMarker>,
}

impl TimelineReport {
    pub(crate) fn to_text(&self) -> String {
        let layout = &self.layout;
        let mut out = format!(
            "{} at ({:.2}, {:.2})\n",
            layout.source, layout.source_point.x, layout.source_point.y
        );
        for (node, connection) in layout.nodes.iter().zip(&layout.connections) {
            let members: Vec<String> = node
                .cluster
                .references
                .iter()
                .map(|m| m.reference.to_string())
                .collect();
            let _ = writeln!(
                out,
                "\n{} [{}] {} reference(s): {}\n  path: {}\n  width: {:.1}",
                node.cluster.book(),
                node.cluster.position,
                node.cluster.len(),
                members.join(", "),
                connection.svg_path(),
                connection.thickness
            );
        }
        if !self.markers.is_empty() {
            let _ = writeln!(out, "\n{} book markers", self.markers.len());
        }
        out
    }
}

/// Inputs for `timeline`
#[derive(Debug, Clone)]
pub(crate) struct TimelineArgs {
    pub(crate) source: String,
    pub(crate) cross_references: Vec<CrossReference>,
    pub(crate) circle: Circle,
    pub(crate) markers: bool,
}

pub(crate) fn timeline(args: &TimelineArgs) -> Result<TimelineReport> {
    let canon = Canon::timeline();
    let Some(layout) =
        TimelineLayout::build(&canon, &args.source, &args.cross_references, args.circle)
    else {
        bail!("source reference '{}' did not resolve", args.source);
    };

    let placed: usize = layout.nodes.iter().map(|n| n.cluster.len()).sum();
    let dropped = args.cross_references.len() - placed;
    if dropped > 0 {
        tracing::warn!("{} cross-reference(s) did not resolve and were dropped", dropped);
    }

    let markers = if args.markers {
        TimelineLayout::book_markers(&canon, args.circle)
    } else {
        Vec::new()
    };
    Ok(TimelineReport { layout, markers })
}

/// Cross-references from a JSON list of objects or strings
pub(crate) fn read_cross_references(path: &Path) -> Result<Vec<CrossReference>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Plain(String),
        Annotated(CrossReference),
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let entries: Vec<Entry> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a list of cross-references", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Plain(reference) => CrossReference::new(reference),
            Entry::Annotated(cross) => cross,
        })
        .collect())
}

/// Inputs for `commentary`
#[derive(Debug, Clone)]
pub(crate) struct CommentaryArgs {
    pub(crate) passage: PathBuf,
    pub(crate) verse: String,
    pub(crate) config: Option<PathBuf>,
    pub(crate) store: Option<PathBuf>,
    pub(crate) provider: Option<ProviderKind>,
    pub(crate) regenerate: bool,
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<StudyConfig> {
    match path {
        Some(path) => StudyConfig::load(path).context("loading configuration"),
        None => Ok(StudyConfig::default()),
    }
}

pub(crate) fn read_passage(path: &Path) -> Result<StudyPassage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let passage: StudyPassage = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a study passage", path.display()))?;
    if passage.is_empty() {
        bail!("passage {} has no verses", path.display());
    }
    for reference in passage.unresolved(&Canon::passage_lookup()) {
        tracing::warn!("passage reference '{}' is not a canonical reference", reference);
    }
    Ok(passage)
}

pub(crate) async fn commentary(args: &CommentaryArgs) -> Result<Commentary> {
    let config = load_config(args.config.as_deref())?;
    let passage = read_passage(&args.passage)?;

    let mut providers = config.providers.clone();
    if let Some(kind) = args.provider {
        providers.default = kind;
    }
    let registry = ProviderRegistry::from_config(&providers)?;
    let provider = registry.default_provider()?;
    tracing::info!("using provider {}", provider.kind());

    let mut session = StudySession::with_provider(passage, provider, config.generation.clone());
    if let Some(path) = &args.store {
        session = session.with_store(Arc::new(JsonFileStore::new(path.clone())));
        let restored = session.restore().await?;
        tracing::debug!("{} commentaries already stored", restored);
    }

    let result = if args.regenerate {
        session.regenerate(&args.verse).await
    } else {
        session.commentary_for(&args.verse).await
    };
    result.with_context(|| format!("commentary for {}", args.verse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn resolve_reports_position_and_testament() {
        let report = resolve("Romans 8:28-30", &Canon::timeline()).unwrap();
        assert_eq!(report.reference.book, "Romans");
        assert_eq!(report.testament, Some(Testament::New));
        assert_eq!(report.position, CanonPosition::from_order(45));
        assert!(report.to_text().starts_with("Romans 8:28\n"));
    }

    #[test]
    fn resolve_spelling_per_canon() {
        assert!(resolve("Psalm 23:1", &Canon::timeline()).is_err());
        assert!(resolve("Psalm 23:1", &Canon::passage_lookup()).is_ok());
        let err = resolve("Hezekiah 1:1", &Canon::timeline()).unwrap_err();
        assert!(format!("{err:#}").contains("Hezekiah"));
    }

    #[test]
    fn timeline_clusters_and_markers() {
        let args = TimelineArgs {
            source: "John 3:16".into(),
            cross_references: vec![
                CrossReference::new("Genesis 1:1"),
                CrossReference::new("Genesis 3:15"),
                CrossReference::new("Isaiah 53:5"),
                CrossReference::new("NotABook 1:1"),
            ],
            circle: Circle::default(),
            markers: true,
        };
        let report = timeline(&args).unwrap();
        assert_eq!(report.layout.nodes.len(), 2);
        assert_eq!(report.markers.len(), 66);

        let text = report.to_text();
        assert!(text.contains("Genesis ["));
        assert!(text.contains("path: M "));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("nodes").is_some());
        assert_eq!(json["markers"].as_array().unwrap().len(), 66);
    }

    #[test]
    fn timeline_unresolved_source_fails() {
        let args = TimelineArgs {
            source: "Nowhere 1:1".into(),
            cross_references: vec![CrossReference::new("Genesis 1:1")],
            circle: Circle::default(),
            markers: false,
        };
        assert!(timeline(&args).is_err());
    }

    #[test]
    fn cross_references_from_mixed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"["Genesis 22:8", {{ "reference": "Isaiah 53:5", "connection": "suffering servant" }}]"#
        )
        .unwrap();

        let refs = read_cross_references(file.path()).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference, "Genesis 22:8");
        assert_eq!(
            refs[1].annotation.connection.as_deref(),
            Some("suffering servant")
        );
    }

    #[test]
    fn passage_must_have_verses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "verses": [] }}"#).unwrap();
        assert!(read_passage(file.path()).is_err());
    }

    #[test]
    fn default_config_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.timeline.circle(), Circle::default());
    }
}
