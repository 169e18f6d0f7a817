//! Compilation of path templates into anchored, case-insensitive matchers.
//!
//! A template is made of literal text and named wildcards:
//! ```ignore
//!  Template: /blog/{category}/{post}
//!
//!  /blog/rust/routers            match: category="rust", post="routers"
//!  /BLOG/rust/routers            match: category="rust", post="routers"
//!  /blog/rust/                   no match
//!  /blog/rust/routers/comments   no match
//! ```
//!
//! A wildcard captures one or more word characters (`\w+`). There are no typed
//! wildcards, no optional segments and no per-wildcard expressions.
use crate::error::Error;
use crate::params::Params;
use crate::path;

use regex::{Regex, RegexBuilder};
use std::mem;

const WILDCARD: &str = r"(\w+)";

/// A piece of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Wildcard(String),
}

/// A path template compiled once at registration time.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl Pattern {
    /// Normalizes and compiles a path template.
    ///
    /// ```rust
    /// use flyrouter::Pattern;
    ///
    /// let pattern = Pattern::compile("hola/{name}/").unwrap();
    /// assert_eq!(pattern.template(), "/hola/{name}");
    /// assert_eq!(pattern.wildcards().collect::<Vec<_>>(), vec!["name"]);
    ///
    /// let params = pattern.captures("/hola/Ana").unwrap();
    /// assert_eq!(params.get("name"), Some("Ana"));
    /// ```
    pub fn compile(template: &str) -> Result<Self, Error> {
        let template = path::normalize(template);
        let segments = parse(&template)?;

        let mut source = String::with_capacity(template.len() + 8);
        source.push('^');
        for segment in &segments {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(text)),
                Segment::Wildcard(_) => source.push_str(WILDCARD),
            }
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::pattern(&template, e.to_string()))?;

        Ok(Self {
            template,
            segments,
            regex,
        })
    }

    /// The normalized template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Wildcard names in the order they appear in the template.
    pub fn wildcards(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Wildcard(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_wildcards(&self) -> bool {
        self.wildcards().next().is_some()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches a full path, returning the captured wildcard values in template order.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::with_capacity(captures.len() - 1);

        for (i, name) in self.wildcards().enumerate() {
            if let Some(value) = captures.get(i + 1) {
                params.push(name, value.as_str());
            }
        }

        Some(params)
    }

    /// Substitutes wildcard placeholders with the values returned by `lookup`.
    ///
    /// Values are inserted verbatim. Returns the name of the first wildcard
    /// that `lookup` has no value for.
    pub fn expand<'v, F>(&self, lookup: F) -> Result<String, &str>
    where
        F: Fn(&str) -> Option<&'v str>,
    {
        let mut uri = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => uri.push_str(text),
                Segment::Wildcard(name) => match lookup(name) {
                    Some(value) => uri.push_str(value),
                    None => return Err(name.as_str()),
                },
            }
        }
        Ok(uri)
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if !closed {
                    return Err(Error::pattern(template, "unclosed wildcard"));
                }
                if name.is_empty() {
                    return Err(Error::pattern(template, "empty wildcard name"));
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(Error::pattern(
                        template,
                        format!("malformed wildcard name `{}`", name),
                    ));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Wildcard(n) if *n == name))
                {
                    return Err(Error::pattern(
                        template,
                        format!("wildcard `{}` appears more than once", name),
                    ));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(mem::take(&mut literal)));
                }
                segments.push(Segment::Wildcard(name));
            }
            '}' => return Err(Error::pattern(template, "unexpected `}`")),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}
