use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Where a dynamic operation was written. Only used to enrich diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CallSiteInfo {
    pub script: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl CallSiteInfo {
    pub fn new(script: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            script: Some(script.into()),
            line,
            column,
        }
    }

    pub fn synthetic() -> Self {
        Self {
            script: None,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for CallSiteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.script.as_deref().unwrap_or("<anonymous>"),
            self.line,
            self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
        site: CallSiteInfo,
    },
    Variable {
        name: String,
        site: CallSiteInfo,
    },
    Property {
        target: Box<Expr>,
        name: String,
        site: CallSiteInfo,
    },
    MethodCall {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
        site: CallSiteInfo,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        site: CallSiteInfo,
    },
    Add {
        left: Box<Expr>,
        right: Box<Expr>,
        site: CallSiteInfo,
    },
    Foreach {
        variable: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
        site: CallSiteInfo,
    },
    Block {
        statements: Vec<Expr>,
        site: CallSiteInfo,
    },
}

impl Expr {
    pub fn site(&self) -> &CallSiteInfo {
        match self {
            Self::Literal { site, .. }
            | Self::Variable { site, .. }
            | Self::Property { site, .. }
            | Self::MethodCall { site, .. }
            | Self::Assign { site, .. }
            | Self::Add { site, .. }
            | Self::Foreach { site, .. }
            | Self::Block { site, .. } => site,
        }
    }
}

/// A compiled script: the parsed tree plus the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub name: String,
    pub source: String,
    pub body: Expr,
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn call_site_display_falls_back_for_anonymous_scripts() {
        assert_eq!(CallSiteInfo::new("main", 3, 7).to_string(), "main:3:7");
        assert_eq!(CallSiteInfo::synthetic().to_string(), "<anonymous>:1:1");
    }

    #[test]
    fn call_site_serializes_as_plain_record() {
        let json = serde_json::to_string(&CallSiteInfo::new("main", 2, 4)).expect("serialize");
        assert_eq!(json, r#"{"script":"main","line":2,"column":4}"#);
        let back: CallSiteInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, CallSiteInfo::new("main", 2, 4));
    }

    #[test]
    fn expr_site_reads_every_variant() {
        let site = CallSiteInfo::new("s", 1, 5);
        let expr = Expr::Property {
            target: Box::new(Expr::Variable {
                name: "x".to_string(),
                site: CallSiteInfo::new("s", 1, 1),
            }),
            name: "size".to_string(),
            site: site.clone(),
        };
        assert_eq!(expr.site(), &site);
    }
}
