//! Tag names and descriptions
//!
//! Output keys are local names (the part after the namespace prefix),
//! and every tag carries a human-readable `description` derived from
//! its value. Known tags get their values translated the way EXIF
//! viewers present them; unknown values pass through verbatim.

use crate::core::tag::{ArrayItem, Tag, TagValue};
use indexmap::IndexMap;

/// The local part of a qualified name (after the first colon).
pub fn local_name(qname: &str) -> &str {
    match qname.split_once(':') {
        Some((_, local)) => local,
        None => qname,
    }
}

/// Local name used as an output key.
///
/// Microsoft's rating tag (`MicrosoftPhoto:Rating`, including the
/// `MicrosoftPhoto_1_`-style extension prefixes some writers emit) is
/// renamed to `RatingPercent` to keep it distinct from `xmp:Rating`.
pub fn tag_local_name(qname: &str) -> &str {
    if is_microsoft_rating(qname) {
        "RatingPercent"
    } else {
        local_name(qname)
    }
}

/// Matches `MicrosoftPhoto(_<digits>_)?:Rating`, case-insensitive.
fn is_microsoft_rating(qname: &str) -> bool {
    let lower = qname.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("microsoftphoto") else {
        return false;
    };
    let rest = match rest.strip_prefix('_') {
        Some(tail) => {
            let Some(end) = tail.find('_') else {
                return false;
            };
            if end == 0 || !tail[..end].bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            &tail[end + 1..]
        }
        None => rest,
    };
    rest == ":rating"
}

/// Description of a scalar value, translated for known tags.
pub fn describe_scalar(qname: &str, value: &str) -> String {
    translate_scalar(qname, value).unwrap_or_else(|| value.to_string())
}

/// Description of an array: the per-tag translator when one exists,
/// else the comma-joined item descriptions.
pub fn describe_array(qname: &str, items: &[ArrayItem]) -> String {
    let descriptions: Vec<String> = items
        .iter()
        .map(|item| match item {
            ArrayItem::Tag(tag) => tag.description.clone(),
            ArrayItem::Struct(members) => describe_struct(members),
        })
        .collect();
    translate_array(qname, &descriptions).unwrap_or_else(|| descriptions.join(", "))
}

/// Description of a structure: `"Key: Description"` pairs joined with
/// `"; "`, keys rewritten through the display table.
pub fn describe_struct(members: &IndexMap<String, Tag>) -> String {
    members
        .iter()
        .map(|(key, tag)| format!("{}: {}", display_key(key), tag.description))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Description of an already-built value.
pub fn describe_value(qname: &str, value: &TagValue) -> String {
    match value {
        TagValue::Text(text) => describe_scalar(qname, text),
        TagValue::Struct(members) => describe_struct(members),
        TagValue::Array(items) => describe_array(qname, items),
    }
}

/// IPTC Core Creator Contact Info field names as displayed.
fn display_key(raw: &str) -> &str {
    match raw {
        "CiAdrCity" => "CreatorCity",
        "CiAdrCtry" => "CreatorCountry",
        "CiAdrExtadr" => "CreatorAddress",
        "CiAdrPcode" => "CreatorPostalCode",
        "CiAdrRegion" => "CreatorRegion",
        "CiEmailWork" => "CreatorWorkEmail",
        "CiTelWork" => "CreatorWorkPhone",
        "CiUrlWork" => "CreatorWorkUrl",
        other => other,
    }
}

/// Per-tag scalar translators, indexed by the original qualified name.
fn translate_scalar(qname: &str, value: &str) -> Option<String> {
    let translated = match qname {
        "tiff:Orientation" => match value {
            "1" => "Horizontal (normal)",
            "2" => "Mirror horizontal",
            "3" => "Rotate 180",
            "4" => "Mirror vertical",
            "5" => "Mirror horizontal and rotate 270 CW",
            "6" => "Rotate 90 CW",
            "7" => "Mirror horizontal and rotate 90 CW",
            "8" => "Rotate 270 CW",
            _ => return None,
        },
        "tiff:ResolutionUnit" => match value {
            "1" => "None",
            "2" => "inches",
            "3" => "cm",
            _ => return None,
        },
        "exif:ExposureProgram" => match value {
            "0" => "Not defined",
            "1" => "Manual",
            "2" => "Normal program",
            "3" => "Aperture priority",
            "4" => "Shutter priority",
            "5" => "Creative program",
            "6" => "Action program",
            "7" => "Portrait mode",
            "8" => "Landscape mode",
            _ => return None,
        },
        "exif:MeteringMode" => match value {
            "0" => "Unknown",
            "1" => "Average",
            "2" => "Center weighted average",
            "3" => "Spot",
            "4" => "Multi-spot",
            "5" => "Pattern",
            "6" => "Partial",
            "255" => "Other",
            _ => return None,
        },
        _ => return None,
    };
    Some(translated.to_string())
}

/// Per-tag array translators, indexed by the original qualified name.
fn translate_array(qname: &str, descriptions: &[String]) -> Option<String> {
    match qname {
        "exif:ComponentsConfiguration" => {
            let mut out = String::new();
            for item in descriptions {
                out.push_str(match item.as_str() {
                    "0" => "",
                    "1" => "Y",
                    "2" => "Cb",
                    "3" => "Cr",
                    "4" => "R",
                    "5" => "G",
                    "6" => "B",
                    _ => return None,
                });
            }
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_tag(value: &str) -> Tag {
        Tag {
            value: TagValue::Text(value.to_string()),
            attributes: IndexMap::new(),
            description: value.to_string(),
        }
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("xmp:CreatorTool"), "CreatorTool");
        assert_eq!(local_name("NoPrefix"), "NoPrefix");
        assert_eq!(local_name("a:b:c"), "b:c");
    }

    #[test]
    fn test_microsoft_rating_rename() {
        assert_eq!(tag_local_name("MicrosoftPhoto:Rating"), "RatingPercent");
        assert_eq!(tag_local_name("microsoftphoto:rating"), "RatingPercent");
        assert_eq!(tag_local_name("MicroSoftPhoto_1_:Rating"), "RatingPercent");
        assert_eq!(tag_local_name("MicrosoftPhoto_12_:Rating"), "RatingPercent");
        assert_eq!(tag_local_name("MicrosoftPhoto:LensModel"), "LensModel");
        assert_eq!(tag_local_name("MicrosoftPhoto_x_:Rating"), "Rating");
        assert_eq!(tag_local_name("xmp:Rating"), "Rating");
    }

    #[test]
    fn test_orientation_translation() {
        assert_eq!(describe_scalar("tiff:Orientation", "3"), "Rotate 180");
        assert_eq!(describe_scalar("tiff:Orientation", "1"), "Horizontal (normal)");
        assert_eq!(describe_scalar("tiff:Orientation", "6"), "Rotate 90 CW");
        // Unknown values pass through.
        assert_eq!(describe_scalar("tiff:Orientation", "9"), "9");
        assert_eq!(describe_scalar("xmp:CreatorTool", "3"), "3");
    }

    #[test]
    fn test_struct_description_uses_display_keys() {
        let mut members = IndexMap::new();
        members.insert("CiAdrCity".to_string(), text_tag("Paris"));
        members.insert("CiEmailWork".to_string(), text_tag("x@y.z"));
        members.insert("Other".to_string(), text_tag("v"));
        assert_eq!(
            describe_struct(&members),
            "CreatorCity: Paris; CreatorWorkEmail: x@y.z; Other: v"
        );
    }

    #[test]
    fn test_array_description_joins_items() {
        let items = vec![
            ArrayItem::Tag(text_tag("47")),
            ArrayItem::Tag(text_tag("11")),
        ];
        assert_eq!(describe_array("dc:subject", &items), "47, 11");
    }

    #[test]
    fn test_components_configuration_array_translator() {
        let items: Vec<ArrayItem> = ["1", "2", "3", "0"]
            .iter()
            .map(|v| ArrayItem::Tag(text_tag(v)))
            .collect();
        assert_eq!(
            describe_array("exif:ComponentsConfiguration", &items),
            "YCbCr"
        );
        // Unknown digits fall back to the default join.
        let items = vec![ArrayItem::Tag(text_tag("7"))];
        assert_eq!(describe_array("exif:ComponentsConfiguration", &items), "7");
    }
}
