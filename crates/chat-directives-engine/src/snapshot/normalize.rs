use std::fmt;

use serde::Serialize;

use crate::extraction::Extraction;
use crate::models::Directive;

#[derive(Debug, Serialize)]
pub struct Snap {
    pub run: Vec<DirectiveSnap>,
    pub suggested: Vec<DirectiveSnap>,
    pub wrappers: Vec<WrapperSnap>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DirectiveSnap {
    pub command: String,
    pub action: Option<String>,
    pub properties: Vec<(String, String)>,
    pub task: Option<String>,
    pub span: (usize, usize),
}

#[derive(Debug, Serialize)]
pub struct WrapperSnap {
    pub keyword: String,
    pub span: (usize, usize),
    pub members: Vec<usize>,
}

pub fn normalize(extraction: &Extraction) -> Snap {
    Snap {
        run: extraction.run.iter().map(directive).collect(),
        suggested: extraction.suggested.iter().map(directive).collect(),
        wrappers: extraction
            .wrappers
            .iter()
            .map(|w| WrapperSnap {
                keyword: w.keyword.clone(),
                span: (w.wrapper_start, w.wrapper_end),
                members: w.task_indices.clone(),
            })
            .collect(),
        text: extraction.text.clone(),
    }
}

fn directive(d: &Directive) -> DirectiveSnap {
    DirectiveSnap {
        command: d.command.clone(),
        action: d.action.clone(),
        properties: d
            .properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        task: d.task.as_ref().map(ToString::to_string),
        span: (d.start, d.end),
    }
}

impl fmt::Display for DirectiveSnap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.command)?;
        if let Some(action) = &self.action {
            write!(f, " {action}")?;
        }
        for (k, v) in &self.properties {
            write!(f, " {k}={v}")?;
        }
        let task = self.task.as_deref().unwrap_or("-");
        write!(f, " -> {task} @ {}..{}", self.span.0, self.span.1)
    }
}

impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run:")?;
        for (i, d) in self.run.iter().enumerate() {
            writeln!(f, "  [{i}] {d}")?;
        }
        writeln!(f, "suggested:")?;
        for (i, d) in self.suggested.iter().enumerate() {
            writeln!(f, "  [{i}] {d}")?;
        }
        writeln!(f, "wrappers:")?;
        for w in &self.wrappers {
            writeln!(f, "  {} @ {}..={} {:?}", w.keyword, w.span.0, w.span.1, w.members)?;
        }
        write!(f, "text: {:?}", self.text)
    }
}
