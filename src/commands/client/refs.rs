use crate::error::{TrackdeskError, TrackdeskResult};

pub const MAX_SUB_REFS: usize = 5;
pub const SUB_REF_MAX_LEN: usize = 50;
pub const REF_FIELD_MAX_LEN: usize = 50;

/// Splits a stored semicolon-joined reference into its editable sub-fields.
/// Element i goes to sub-field i; a short list leaves the tail empty, and
/// segments past the fifth are dropped (legacy rows only).
pub fn decode_refs(stored: &str) -> [String; MAX_SUB_REFS] {
    let mut subs: [String; MAX_SUB_REFS] = Default::default();
    for (i, segment) in stored.split(';').take(MAX_SUB_REFS).enumerate() {
        subs[i] = segment.to_string();
    }
    subs
}

/// Joins the sub-fields back into the stored form. Blank sub-fields are
/// dropped, so a decode of "A;;C" re-encodes as "A;C": positions compact
/// while relative order is kept.
pub fn encode_refs(subs: &[String; MAX_SUB_REFS]) -> String {
    subs.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(";")
}

/// Form-layer rules for one reference group: the first sub-field is
/// mandatory, every sub-field and the joined result stay within the Sage
/// column width. Returns the encoded composite.
pub fn validate_ref_group(label: &str, subs: &[String; MAX_SUB_REFS]) -> TrackdeskResult<String> {
    if subs[0].trim().is_empty() {
        return Err(TrackdeskError::Validation(format!(
            "{} 1 is required",
            label
        )));
    }
    for (i, sub) in subs.iter().enumerate() {
        if sub.trim().len() > SUB_REF_MAX_LEN {
            return Err(TrackdeskError::Validation(format!(
                "{} {} must be at most {} characters",
                label,
                i + 1,
                SUB_REF_MAX_LEN
            )));
        }
    }
    let encoded = encode_refs(subs);
    if encoded.len() > REF_FIELD_MAX_LEN {
        return Err(TrackdeskError::Validation(format!(
            "Combined {} values must be at most {} characters",
            label, REF_FIELD_MAX_LEN
        )));
    }
    Ok(encoded)
}
