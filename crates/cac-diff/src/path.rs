//! Paths to fields inside a configuration tree

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    /// Any element of an array; elements are compared without regard to order
    Element,
}

/// Location of a value, from the tree root.
///
/// Rules match against [`FieldPath::match_form`] (`["a"]["b"][*]`), which
/// keeps key boundaries unambiguous. [`Display`](fmt::Display) gives the
/// dotted form (`a.b[*]`) used in diff output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    pub fn element(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Element);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn match_form(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Key(key) => format!("[{key:?}]"),
                Segment::Element => "[*]".to_string(),
            })
            .collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if index == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Element => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_and_display_forms() {
        let path = FieldPath::root().key("clients").key("c1").key("redirect_uris").element();
        assert_eq!(path.match_form(), r#"["clients"]["c1"]["redirect_uris"][*]"#);
        assert_eq!(path.to_string(), "clients.c1.redirect_uris[*]");
    }

    #[test]
    fn keys_with_dots_stay_unambiguous() {
        let dotted = FieldPath::root().key("a.b");
        let nested = FieldPath::root().key("a").key("b");
        assert_ne!(dotted.match_form(), nested.match_form());
    }

    #[test]
    fn root_is_empty() {
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::root().match_form(), "");
    }
}
