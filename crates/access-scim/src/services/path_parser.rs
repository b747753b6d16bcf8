//! SCIM PATCH path parsing (RFC 7644 Section 3.5.2).
//!
//! A path is `attribute[valueFilter].subAttribute`, where the filter and the
//! sub-attribute are optional and the attribute may carry a schema URN
//! prefix. Value filters use the filter grammar of RFC 7644 Section 3.4.2.2,
//! parsed by recursive descent.

use crate::error::{ScimError, ScimResult};

/// SCIM filter comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    /// Present (not null)
    Pr,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "co" => Some(CompareOp::Co),
            "sw" => Some(CompareOp::Sw),
            "ew" => Some(CompareOp::Ew),
            "pr" => Some(CompareOp::Pr),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }
}

/// Comparison literal.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Boolean(bool),
    Number(f64),
    Null,
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// attribute op value
    Compare {
        attribute: String,
        op: CompareOp,
        value: Option<FilterValue>,
    },
    Logical {
        left: Box<FilterExpr>,
        op: LogicalOp,
        right: Box<FilterExpr>,
    },
    Not(Box<FilterExpr>),
    /// (expression)
    Group(Box<FilterExpr>),
}

impl FilterExpr {
    /// The string compared against `attribute`, if this filter is exactly
    /// `attribute eq "<string>"` (optionally parenthesized).
    #[must_use]
    pub fn equality_value(&self, attribute: &str) -> Option<&str> {
        match self {
            FilterExpr::Compare {
                attribute: attr,
                op: CompareOp::Eq,
                value: Some(FilterValue::String(value)),
            } if attr.eq_ignore_ascii_case(attribute) => Some(value),
            FilterExpr::Group(inner) => inner.equality_value(attribute),
            _ => None,
        }
    }
}

/// SCIM filter parser.
pub struct FilterParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FilterParser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse a complete filter expression.
    pub fn parse(&mut self) -> ScimResult<FilterExpr> {
        let expr = self.parse_or()?;
        self.skip_whitespace();
        if !self.remaining().is_empty() {
            return Err(ScimError::InvalidFilter(format!(
                "Unexpected characters at position {}: '{}'",
                self.pos,
                self.remaining()
            )));
        }
        Ok(expr)
    }

    /// Parse a value filter up to and including its closing `]`.
    ///
    /// The parser is left just past the bracket.
    pub fn parse_value_filter(&mut self) -> ScimResult<FilterExpr> {
        let expr = self.parse_or()?;
        self.skip_whitespace();
        if !self.try_consume_char(']') {
            return Err(ScimError::InvalidFilter(
                "Expected ']' to close value filter".to_string(),
            ));
        }
        Ok(expr)
    }

    /// Input not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        let input = self.input;
        &input[self.pos..]
    }

    fn parse_or(&mut self) -> ScimResult<FilterExpr> {
        let mut left = self.parse_and()?;

        loop {
            self.skip_whitespace();
            if self.try_consume_keyword("or") {
                let right = self.parse_and()?;
                left = FilterExpr::Logical {
                    left: Box::new(left),
                    op: LogicalOp::Or,
                    right: Box::new(right),
                };
            } else {
                break;
            }
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ScimResult<FilterExpr> {
        let mut left = self.parse_unary()?;

        loop {
            self.skip_whitespace();
            if self.try_consume_keyword("and") {
                let right = self.parse_unary()?;
                left = FilterExpr::Logical {
                    left: Box::new(left),
                    op: LogicalOp::And,
                    right: Box::new(right),
                };
            } else {
                break;
            }
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ScimResult<FilterExpr> {
        self.skip_whitespace();

        if self.try_consume_keyword("not") {
            self.skip_whitespace();
            if !self.try_consume_char('(') {
                return Err(ScimError::InvalidFilter(
                    "Expected '(' after 'not'".to_string(),
                ));
            }
            let expr = self.parse_or()?;
            self.skip_whitespace();
            if !self.try_consume_char(')') {
                return Err(ScimError::InvalidFilter(
                    "Expected ')' to close 'not' expression".to_string(),
                ));
            }
            return Ok(FilterExpr::Not(Box::new(expr)));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ScimResult<FilterExpr> {
        self.skip_whitespace();

        if self.try_consume_char('(') {
            let expr = self.parse_or()?;
            self.skip_whitespace();
            if !self.try_consume_char(')') {
                return Err(ScimError::InvalidFilter(
                    "Expected ')' to close grouped expression".to_string(),
                ));
            }
            return Ok(FilterExpr::Group(Box::new(expr)));
        }

        self.parse_attr_expr()
    }

    fn parse_attr_expr(&mut self) -> ScimResult<FilterExpr> {
        let attribute = self.parse_attribute()?;
        self.skip_whitespace();

        let op_str = self.parse_operator()?;
        let op = CompareOp::parse(op_str)
            .ok_or_else(|| ScimError::InvalidFilter(format!("Unknown operator: {op_str}")))?;

        if op == CompareOp::Pr {
            return Ok(FilterExpr::Compare {
                attribute,
                op,
                value: None,
            });
        }

        self.skip_whitespace();
        let value = self.parse_value()?;

        Ok(FilterExpr::Compare {
            attribute,
            op,
            value: Some(value),
        })
    }

    fn parse_attribute(&mut self) -> ScimResult<String> {
        let name = self.take_while(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | ':' | '-' | '$'));
        if name.is_empty() {
            return Err(ScimError::InvalidFilter(
                "Expected attribute name".to_string(),
            ));
        }
        Ok(name.to_string())
    }

    fn parse_operator(&mut self) -> ScimResult<&'a str> {
        let op = self.take_while(char::is_alphabetic);
        if op.is_empty() {
            return Err(ScimError::InvalidFilter("Expected operator".to_string()));
        }
        Ok(op)
    }

    fn parse_value(&mut self) -> ScimResult<FilterValue> {
        if self.try_consume_char('"') {
            let mut value = String::new();
            loop {
                match self.next_char() {
                    None => {
                        return Err(ScimError::InvalidFilter("Unterminated string".to_string()))
                    }
                    Some('"') => return Ok(FilterValue::String(value)),
                    Some('\\') => match self.next_char() {
                        Some(escaped) => value.push(escaped),
                        None => {
                            return Err(ScimError::InvalidFilter(
                                "Unterminated string".to_string(),
                            ))
                        }
                    },
                    Some(c) => value.push(c),
                }
            }
        }

        let literal = self.take_while(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+'));
        match literal.to_ascii_lowercase().as_str() {
            "" => Err(ScimError::InvalidFilter("Expected value".to_string())),
            "true" => Ok(FilterValue::Boolean(true)),
            "false" => Ok(FilterValue::Boolean(false)),
            "null" => Ok(FilterValue::Null),
            _ => literal
                .parse()
                .map(FilterValue::Number)
                .map_err(|_| ScimError::InvalidFilter(format!("Invalid value: {literal}"))),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let input = self.input;
        &input[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn try_consume_char(&mut self, c: char) -> bool {
        if self.current_char() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn try_consume_keyword(&mut self, keyword: &str) -> bool {
        let remaining = self.remaining();
        let Some(head) = remaining.get(..keyword.len()) else {
            return false;
        };
        let at_boundary = remaining[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if head.eq_ignore_ascii_case(keyword) && at_boundary {
            self.pos += keyword.len();
            self.skip_whitespace();
            return true;
        }
        false
    }
}

/// A parsed PATCH path.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchPath {
    /// Attribute name without schema URN.
    pub attribute: String,
    pub value_filter: Option<FilterExpr>,
    pub sub_attribute: Option<String>,
}

impl PatchPath {
    /// Case-insensitive attribute name match.
    #[must_use]
    pub fn is_attribute(&self, name: &str) -> bool {
        self.attribute.eq_ignore_ascii_case(name)
    }

    /// The path names a whole attribute, with no filter or sub-attribute.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.value_filter.is_none() && self.sub_attribute.is_none()
    }
}

/// Parse a PATCH `path`.
pub fn parse_patch_path(path: &str) -> ScimResult<PatchPath> {
    let path = path.trim();
    let invalid = || ScimError::InvalidPatchOp(format!("Invalid path: '{path}'"));

    let (head, filter_and_rest) = match path.find('[') {
        Some(i) => (&path[..i], Some(&path[i + 1..])),
        None => (path, None),
    };

    let head = if head.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("urn:")) {
        head.rsplit(':').next().unwrap_or(head)
    } else {
        head
    };

    let (attribute, mut sub_attribute) = match (filter_and_rest, head.split_once('.')) {
        (None, Some((attr, sub))) => (attr, Some(sub.to_string())),
        _ => (head, None),
    };

    let value_filter = match filter_and_rest {
        Some(rest) => {
            let mut parser = FilterParser::new(rest);
            let filter = parser.parse_value_filter()?;
            match parser.remaining() {
                "" => {}
                tail => match tail.strip_prefix('.') {
                    Some(sub) if is_attribute_name(sub) => sub_attribute = Some(sub.to_string()),
                    _ => return Err(invalid()),
                },
            }
            Some(filter)
        }
        None => None,
    };

    if !is_attribute_name(attribute)
        || sub_attribute.as_deref().is_some_and(|s| !is_attribute_name(s))
    {
        return Err(invalid());
    }

    Ok(PatchPath {
        attribute: attribute.to_string(),
        value_filter,
        sub_attribute,
    })
}

fn is_attribute_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '$'))
}
