use crate::range::Range;
use crate::ts::errors::TreeSitterError;
use crate::ts::parser::ParsedSource;
use ast_grep_language::{LanguageExt, SupportLang};
use std::collections::HashMap;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

/// A match from a tree-sitter query with its captured nodes.
#[derive(Debug, Clone)]
pub struct QueryMatch<'t> {
    /// Span covering every capture of the match
    pub range: Range,
    pub captures: HashMap<String, Node<'t>>,
}

impl<'t> QueryMatch<'t> {
    pub fn capture(&self, name: &str) -> Result<Node<'t>, TreeSitterError> {
        self.captures
            .get(name)
            .copied()
            .ok_or_else(|| TreeSitterError::CaptureNotFound {
                name: name.to_string(),
            })
    }
}

/// Engine for locating mutation targets with tree-sitter queries.
pub struct QueryEngine {
    query: Query,
    capture_names: Vec<String>,
}

impl QueryEngine {
    /// Create a new query engine from a tree-sitter query string.
    ///
    /// Queries use S-expression syntax with `@name` captures:
    /// ```text
    /// (function_item
    ///   name: (identifier) @func_name
    ///   body: (block) @body)
    /// ```
    pub fn new(query_str: &str) -> Result<Self, TreeSitterError> {
        let language = SupportLang::Rust.get_ts_language();
        let query = Query::new(&language, query_str).map_err(|e| TreeSitterError::InvalidQuery {
            message: e.to_string(),
        })?;

        let capture_names = query.capture_names().iter().map(|s| s.to_string()).collect();

        Ok(Self {
            query,
            capture_names,
        })
    }

    /// Execute the query against parsed source and return all matches.
    pub fn find_all<'t>(&self, parsed: &'t ParsedSource<'_>) -> Vec<QueryMatch<'t>> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, parsed.root_node(), parsed.source.as_bytes());

        let mut results = Vec::new();

        // tree-sitter 0.25+ uses StreamingIterator
        while let Some(m) = matches.next() {
            let mut captures = HashMap::new();
            let mut span: Option<Range> = None;

            for capture in m.captures {
                let node = capture.node;
                let name = &self.capture_names[capture.index as usize];
                let range = Range::from(node.byte_range());
                span = Some(span.map_or(range, |s| s.cover(&range)));
                captures.insert(name.clone(), node);
            }

            if let Some(range) = span {
                results.push(QueryMatch { range, captures });
            }
        }

        results
    }

    /// Nodes bound to capture `name` across all matches, in match order.
    pub fn captures<'t>(&self, parsed: &'t ParsedSource<'_>, name: &str) -> Vec<Node<'t>> {
        self.find_all(parsed)
            .into_iter()
            .filter_map(|m| m.captures.get(name).copied())
            .collect()
    }

    /// Execute the query and expect exactly one match.
    pub fn find_unique<'t>(
        &self,
        parsed: &'t ParsedSource<'_>,
    ) -> Result<QueryMatch<'t>, TreeSitterError> {
        let mut matches = self.find_all(parsed);

        match matches.len() {
            0 => Err(TreeSitterError::NoMatch),
            1 => matches.pop().ok_or(TreeSitterError::NoMatch),
            n => Err(TreeSitterError::AmbiguousMatch { count: n }),
        }
    }

    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }
}

/// Common tree-sitter queries for Rust constructs.
pub mod queries {
    /// Query for a function by name.
    pub fn function_by_name(name: &str) -> String {
        format!(
            r#"(function_item
                name: (identifier) @name
                (#eq? @name "{name}")
            ) @function"#
        )
    }

    /// Query for a struct by name.
    pub fn struct_by_name(name: &str) -> String {
        format!(
            r#"(struct_item
                name: (type_identifier) @name
                (#eq? @name "{name}")
            ) @struct"#
        )
    }

    /// Query for an impl block by type name.
    pub fn impl_by_type(type_name: &str) -> String {
        format!(
            r#"(impl_item
                type: (type_identifier) @type
                (#eq? @type "{type_name}")
            ) @impl"#
        )
    }

    /// Query for calls to a plain function by name.
    pub fn call_by_name(name: &str) -> String {
        format!(
            r#"(call_expression
                function: (identifier) @name
                (#eq? @name "{name}")
            ) @call"#
        )
    }

    /// Query for method calls by method name.
    pub fn method_call(method_name: &str) -> String {
        format!(
            r#"(call_expression
                function: (field_expression
                    field: (field_identifier) @method
                    (#eq? @method "{method_name}"))
            ) @call"#
        )
    }

    /// Query for struct literals of a type.
    pub fn struct_expression(type_name: &str) -> String {
        format!(
            r#"(struct_expression
                name: (type_identifier) @name
                (#eq? @name "{type_name}")
            ) @struct"#
        )
    }

    /// Query for `let` bindings of a named variable.
    pub fn let_binding(name: &str) -> String {
        format!(
            r#"(let_declaration
                pattern: (identifier) @name
                (#eq? @name "{name}")
            ) @let"#
        )
    }

    /// Query for all functions in file.
    pub const ALL_FUNCTIONS: &str = r#"(function_item
        name: (identifier) @name
    ) @function"#;
}
