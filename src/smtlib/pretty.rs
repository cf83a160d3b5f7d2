/*!
The pretty printer for expressions.

Expressions print as prefix S-expressions, indented two spaces per nesting level.
An application whose arguments are all literals prints on one line; a negation of a literal prints inline as `(not x)`.

Shared non-trivial subexpressions --- applications with arguments, negations aside --- are printed once, labeled `[1]`, `[2]`, …, and listed under a trailing `where` section.

Tseitin variables have no declared name; they render as `τ0`, `τ1`, … in first-encounter order, and any other nameless symbol renders as `{?}`.
*/

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::structures::expr::Expr;
use crate::structures::symbol::{Symbol, SymbolKind};

/// A print-ready image of an expression: a literal string, or a named application.
struct Image {
    literal: bool,
    name: String,
    args: Vec<Rc<Image>>,
}

impl Image {
    fn leaf(name: String) -> Rc<Image> {
        Rc::new(Image {
            literal: true,
            name,
            args: Vec::new(),
        })
    }
}

/// The lines of `image` at `indent` nesting levels.
fn image_lines(image: &Rc<Image>, indent: usize) -> Vec<String> {
    // A negative level marks the close of a multi-line application.
    let mut stack: Vec<(Rc<Image>, isize)> = vec![(image.clone(), indent as isize)];
    let mut lines: Vec<String> = Vec::new();
    while let Some((image, level)) = stack.pop() {
        if level < 0 {
            let line = lines.last_mut().expect("! A close without an open");
            line.push(')');
            continue;
        }
        let pad = "  ".repeat(level as usize);
        if image.args.is_empty() {
            lines.push(format!("{pad}{}", image.name));
        } else if image.args.iter().all(|arg| arg.literal) {
            let parts: Vec<&str> = image.args.iter().map(|arg| arg.name.as_str()).collect();
            lines.push(format!("{pad}({} {})", image.name, parts.join(" ")));
        } else {
            lines.push(format!("{pad}({}", image.name));
            stack.push((image.clone(), -1));
            for arg in image.args.iter().rev() {
                stack.push((arg.clone(), level + 1));
            }
        }
    }
    lines
}

/// Serializes `expr`, resolving symbol names through `name_of_symbol`.
pub(crate) fn serialize(
    expr: &Expr,
    mut name_of_symbol: impl FnMut(&Symbol) -> Option<String>,
) -> String {
    // Label subexpressions which appear under more than one parent.
    let mut seen: HashSet<Expr> = HashSet::new();
    let mut labels: HashMap<Expr, String> = HashMap::new();
    expr.bottom_up(|e| {
        for arg in e.args() {
            if seen.contains(arg)
                && !arg.args().is_empty()
                && !matches!(arg.symbol().kind(), SymbolKind::Negator(_))
            {
                if !labels.contains_key(arg) {
                    let label = format!("[{}]", labels.len() + 1);
                    labels.insert(arg.clone(), label);
                }
            } else {
                seen.insert(arg.clone());
            }
        }
    });

    let mut tseitin_names: HashMap<Symbol, String> = HashMap::new();
    let mut name_of = |symbol: &Symbol| -> String {
        if let Some(name) = name_of_symbol(symbol) {
            return name;
        }
        if matches!(symbol.kind(), SymbolKind::Tseitin(_)) {
            let fresh = format!("τ{}", tseitin_names.len());
            return tseitin_names.entry(symbol.clone()).or_insert(fresh).clone();
        }
        "{?}".to_string()
    };

    let mut references: Vec<(String, Rc<Image>)> = Vec::new();
    let image = expr.bottom_up_eval(|e, children: &[Rc<Image>]| {
        let name = name_of(e.symbol());
        if matches!(e.symbol().kind(), SymbolKind::Negator(_)) && children[0].literal {
            return Image::leaf(format!("({} {})", name, children[0].name));
        }
        let image = Rc::new(Image {
            literal: children.is_empty(),
            name,
            args: children.to_vec(),
        });
        match labels.get(e) {
            Some(label) => {
                references.push((label.clone(), image));
                Image::leaf(label.clone())
            }
            None => image,
        }
    });

    let mut lines = image_lines(&image, 0);
    if !references.is_empty() {
        lines.push("where".to_string());
        for (label, image) in &references {
            lines.push(format!("  {label}:"));
            lines.extend(image_lines(image, 2));
        }
    }
    lines.join("\n")
}
