use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Markers {
    pub fn for_block(block_type: &str) -> Self {
        Self {
            start: format!("<!-- STATS BREAKDOWN START:{block_type} -->"),
            end: format!("<!-- STATS BREAKDOWN END:{block_type} -->"),
        }
    }

    fn wrap(&self, content: &str) -> String {
        format!("{}\n\n{}\n\n{}", self.start, content.trim(), self.end)
    }

    /// Byte ranges of every start/end pair, each end being the nearest one
    /// after its start.
    fn regions(&self, document: &str) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut from = 0;
        while let Some(offset) = document[from..].find(&self.start) {
            let start = from + offset;
            let inner = start + self.start.len();
            let Some(end_offset) = document[inner..].find(&self.end) else {
                break;
            };
            let end = inner + end_offset + self.end.len();
            regions.push((start, end));
            from = end;
        }
        regions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    First,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    #[default]
    Skip,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockUpdate {
    Replaced { document: String, regions: usize },
    Appended(String),
    Missing,
}

impl BlockUpdate {
    pub fn into_document(self, original: &str) -> String {
        match self {
            BlockUpdate::Replaced { document, .. } | BlockUpdate::Appended(document) => document,
            BlockUpdate::Missing => original.to_string(),
        }
    }
}

/// Replaces the text between the markers of `block_type`, keeping the
/// markers. Only this block type's own marker literals are matched.
pub fn replace_block(document: &str, block_type: &str, content: &str, mode: MatchMode) -> Option<(String, usize)> {
    let markers = Markers::for_block(block_type);
    let mut regions = markers.regions(document);
    if regions.is_empty() {
        return None;
    }
    if mode == MatchMode::First {
        regions.truncate(1);
    }

    let replacement = markers.wrap(content);
    let mut out = String::with_capacity(document.len() + replacement.len());
    let mut cursor = 0;
    for (start, end) in &regions {
        out.push_str(&document[cursor..*start]);
        out.push_str(&replacement);
        cursor = *end;
    }
    out.push_str(&document[cursor..]);
    Some((out, regions.len()))
}

pub fn update_block(
    document: &str,
    block_type: &str,
    content: &str,
    mode: MatchMode,
    missing: MissingPolicy,
) -> BlockUpdate {
    if let Some((document, regions)) = replace_block(document, block_type, content, mode) {
        return BlockUpdate::Replaced { document, regions };
    }
    match missing {
        MissingPolicy::Skip => {
            warn!(block = block_type, "no block markers found, skipping");
            BlockUpdate::Missing
        }
        MissingPolicy::Append => {
            warn!(block = block_type, "no block markers found, appending a new block");
            let markers = Markers::for_block(block_type);
            let mut out = document.trim_end().to_string();
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&markers.wrap(content));
            out.push('\n');
            BlockUpdate::Appended(out)
        }
    }
}
