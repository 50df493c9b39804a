//! Well-known XMP namespaces
//!
//! XMP organizes properties into schemas identified by namespace URIs.
//! The reader itself only works with prefixes, but the missing-namespace
//! auto-repair needs real URIs to bind well-known prefixes to.

/// Built-in XMP namespace URIs
pub mod ns {
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XMP meta wrapper namespace
    pub const X: &str = "adobe:ns:meta/";
    /// XMP Basic namespace
    pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
    /// Dublin Core namespace
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// EXIF namespace
    pub const EXIF: &str = "http://ns.adobe.com/exif/1.0/";
    /// EXIF Aux namespace
    pub const EXIF_AUX: &str = "http://ns.adobe.com/exif/1.0/aux/";
    /// TIFF namespace
    pub const TIFF: &str = "http://ns.adobe.com/tiff/1.0/";
    /// Photoshop namespace
    pub const PHOTOSHOP: &str = "http://ns.adobe.com/photoshop/1.0/";
    /// Camera Raw namespace
    pub const CAMERA_RAW: &str = "http://ns.adobe.com/camera-raw-settings/1.0/";
    /// IPTC Core namespace
    pub const IPTC_CORE: &str = "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/";
    /// IPTC Extension namespace
    pub const IPTC_EXT: &str = "http://iptc.org/std/Iptc4xmpExt/2008-02-29/";
    /// XMP Rights namespace
    pub const XMP_RIGHTS: &str = "http://ns.adobe.com/xap/1.0/rights/";
    /// XMP Media Management namespace
    pub const XMP_MM: &str = "http://ns.adobe.com/xap/1.0/mm/";
    /// XMP Basic Job Ticket namespace
    pub const XMP_BJ: &str = "http://ns.adobe.com/xap/1.0/bj/";
    /// XMP Dynamic Media namespace
    pub const XMP_DM: &str = "http://ns.adobe.com/xmp/1.0/DynamicMedia/";
    /// XMP PagedText namespace
    pub const XMP_PAGED: &str = "http://ns.adobe.com/xap/1.0/t/pg/";
    /// PDF namespace
    pub const PDF: &str = "http://ns.adobe.com/pdf/1.3/";
    /// Microsoft Photo namespace
    pub const MICROSOFT_PHOTO: &str = "http://ns.microsoft.com/photo/1.0/";
    /// XML namespace (for xml:lang, etc.)
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Resolve a well-known prefix to its namespace URI.
pub fn uri_for_prefix(prefix: &str) -> Option<&'static str> {
    let uri = match prefix {
        "rdf" => ns::RDF,
        "x" => ns::X,
        "xmp" | "xap" => ns::XMP,
        "dc" => ns::DC,
        "exif" => ns::EXIF,
        "aux" | "exifEX" => ns::EXIF_AUX,
        "tiff" => ns::TIFF,
        "photoshop" => ns::PHOTOSHOP,
        "crs" => ns::CAMERA_RAW,
        "Iptc4xmpCore" => ns::IPTC_CORE,
        "Iptc4xmpExt" => ns::IPTC_EXT,
        "xmpRights" => ns::XMP_RIGHTS,
        "xmpMM" => ns::XMP_MM,
        "xmpBJ" => ns::XMP_BJ,
        "xmpDM" => ns::XMP_DM,
        "xmpTPg" => ns::XMP_PAGED,
        "pdf" => ns::PDF,
        "MicrosoftPhoto" => ns::MICROSOFT_PHOTO,
        "xml" => ns::XML,
        _ => return None,
    };
    Some(uri)
}

/// URI synthesized for prefixes the table does not know.
///
/// The interpreter never resolves URIs, so any syntactically valid URI
/// unblocks parsing.
pub fn placeholder_uri(prefix: &str) -> String {
    format!("http://ns.unknown/{}/", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        assert_eq!(uri_for_prefix("rdf"), Some(ns::RDF));
        assert_eq!(uri_for_prefix("xmp"), Some(ns::XMP));
        assert_eq!(uri_for_prefix("Iptc4xmpCore"), Some(ns::IPTC_CORE));
        assert_eq!(uri_for_prefix("nope"), None);
    }

    #[test]
    fn test_placeholder_uri() {
        assert_eq!(placeholder_uri("foo"), "http://ns.unknown/foo/");
    }
}
