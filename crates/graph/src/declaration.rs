//! Reduction of a declaration to the part that distinguishes overloads.
//!
//! ```text
//! @discardableResult public static func fetch<T>(_ id: T, into store: inout Store)
//!     async throws -> T where T: Key
//! ```
//!
//! becomes `func fetch(_:into:)`: the declaring keyword, the base name, and the
//! argument label of every top-level parameter.

use symgraph_model::{Fragment, FragmentKind};

/// Produce the signature shape of a declaration.
///
/// Applying this to its own output returns the same sequence.
pub fn simplify_declaration(fragments: &[Fragment]) -> Vec<Fragment> {
    let mut keyword: Option<&str> = None;
    let mut identifier: Option<&str> = None;
    let mut params: Option<Vec<String>> = None;
    let mut angle_depth = 0usize;
    // Argument list of a leading attribute, e.g. `@objc(draw:)`
    let mut attribute_depth = 0usize;
    let mut after_attribute = false;

    'prefix: for (index, fragment) in fragments.iter().enumerate() {
        match fragment.kind {
            FragmentKind::Text => {
                for (offset, ch) in fragment.spelling.char_indices() {
                    if attribute_depth > 0 {
                        match ch {
                            '(' => attribute_depth += 1,
                            ')' => attribute_depth -= 1,
                            _ => {}
                        }
                        continue;
                    }
                    if after_attribute {
                        if ch == '(' {
                            attribute_depth = 1;
                            after_attribute = false;
                            continue;
                        }
                        if ch.is_whitespace() {
                            continue;
                        }
                        after_attribute = false;
                    }
                    match ch {
                        '<' => angle_depth += 1,
                        '>' => angle_depth = angle_depth.saturating_sub(1),
                        ':' | '=' | '{' if angle_depth == 0 => break 'prefix,
                        '(' if angle_depth == 0 => {
                            let mut scan = ParamScan::default();
                            let rest = &fragment.spelling[offset + ch.len_utf8()..];
                            if !scan.text(rest) {
                                for next in &fragments[index + 1..] {
                                    if scan.fragment(next) {
                                        break;
                                    }
                                }
                            }
                            params = Some(scan.finish());
                            break 'prefix;
                        }
                        _ => {}
                    }
                }
            }
            _ if attribute_depth > 0 => {}
            FragmentKind::Attribute if angle_depth == 0 && identifier.is_none() => {
                after_attribute = true;
            }
            FragmentKind::Keyword if angle_depth == 0 && identifier.is_none() => {
                after_attribute = false;
                keyword = Some(fragment.spelling.as_str());
            }
            FragmentKind::Identifier if angle_depth == 0 && identifier.is_none() => {
                after_attribute = false;
                identifier = Some(fragment.spelling.as_str());
            }
            _ => after_attribute = false,
        }
    }

    let mut out = Vec::new();
    if let Some(keyword) = keyword {
        out.push(Fragment::keyword(keyword));
    }
    if let Some(identifier) = identifier {
        if !out.is_empty() {
            out.push(Fragment::text(" "));
        }
        out.push(Fragment::identifier(identifier));
    }
    match params {
        None => {}
        Some(params) if params.is_empty() => out.push(Fragment::text("()")),
        Some(params) => {
            out.push(Fragment::text("("));
            let last = params.len() - 1;
            for (index, label) in params.into_iter().enumerate() {
                out.push(Fragment::external_param(label));
                out.push(Fragment::text(if index == last { ":)" } else { ":" }));
            }
        }
    }
    out
}

#[derive(Default)]
struct Param {
    label: Option<String>,
    seen_colon: bool,
    has_content: bool,
}

/// Walks a parameter list after its opening `(`
#[derive(Default)]
struct ParamScan {
    depth: usize,
    previous: Option<char>,
    current: Param,
    labels: Vec<String>,
}

impl ParamScan {
    /// Returns true once the closing `)` was consumed
    fn fragment(&mut self, fragment: &Fragment) -> bool {
        match fragment.kind {
            FragmentKind::Text => return self.text(&fragment.spelling),
            FragmentKind::ExternalParam if self.depth == 0 => {
                if self.current.seen_colon {
                    self.close_param();
                }
                if self.current.label.is_none() {
                    self.current.label = Some(fragment.spelling.clone());
                }
                self.current.has_content = true;
            }
            _ => self.current.has_content = true,
        }
        self.previous = None;
        false
    }

    fn text(&mut self, text: &str) -> bool {
        for ch in text.chars() {
            let previous = self.previous.replace(ch);
            match ch {
                '(' | '[' | '<' => {
                    self.depth += 1;
                    self.current.has_content = true;
                }
                ')' if self.depth == 0 => {
                    self.close_param();
                    return true;
                }
                '>' if previous == Some('-') => {}
                ')' | ']' | '>' => self.depth = self.depth.saturating_sub(1),
                ',' if self.depth == 0 => self.close_param(),
                ':' if self.depth == 0 => self.current.seen_colon = true,
                c if c.is_whitespace() => {}
                _ => self.current.has_content = true,
            }
        }
        false
    }

    fn close_param(&mut self) {
        let param = std::mem::take(&mut self.current);
        if param.has_content || param.label.is_some() {
            self.labels.push(param.label.unwrap_or_else(|| "_".to_string()));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.close_param();
        self.labels
    }
}
