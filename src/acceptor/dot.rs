use itertools::Itertools;

use super::{Acceptor, StateIndex};

/// Attributes that can be attached to a state in the DOT representation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label shown inside the node.
    Label(String),
    /// The shape of the node, `doublecircle` is used for accepting states.
    Shape(String),
}

impl std::fmt::Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape={s}"),
        }
    }
}

fn escape(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}

fn state_ident(q: StateIndex) -> String {
    format!("q{q}")
}

impl Acceptor {
    fn dot_state_attributes(&self, q: StateIndex) -> [DotStateAttribute; 2] {
        let shape = if self.is_accepting(q) {
            "doublecircle"
        } else {
            "circle"
        };
        [
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state_ident(q)),
        ]
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    /// Parallel edges between the same pair of states are combined into one edge whose
    /// label lists all tokens.
    pub fn dot_representation(&self) -> String {
        let header = [
            "digraph A {".to_string(),
            "init [label=\"\", shape=none]".to_string(),
            format!("init -> {}", state_ident(self.initial())),
        ];

        let states = self.states().map(|q| {
            format!(
                "{} [{}]",
                state_ident(q),
                self.dot_state_attributes(q).iter().join(", ")
            )
        });

        let transitions = self
            .transitions()
            .into_group_map_by(|t| (t.source, t.target))
            .into_iter()
            .sorted()
            .map(|((source, target), group)| {
                format!(
                    "{} -> {} [label=\"{}\"]",
                    state_ident(source),
                    state_ident(target),
                    escape(&group.iter().map(|t| t.token).join(", "))
                )
            })
            .collect_vec();

        header
            .into_iter()
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Renders the acceptor visually (as PNG) and returns a vec of bytes encoding the
    /// rendered image. This calls the `dot` binary and is only available on the `graphviz`
    /// crate feature.
    #[cfg(feature = "graphviz")]
    pub fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Read, Write};
        use tracing::trace;

        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {}", status),
            ));
        }

        Ok(output)
    }

    /// Renders the acceptor to a PNG file with the given name. The DOT representation is
    /// written to a temporary file first. Only available on the `graphviz` crate feature.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;
        use tracing::trace;

        trace!("Outputting dot and rendering to png");
        let mut tempfile = tempfile::NamedTempFile::new()?;
        tempfile.write_all(self.dot_representation().as_bytes())?;

        let status = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile.path())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {}", status),
            ))
        }
    }
}
