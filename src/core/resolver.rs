//! Dependency resolution
//!
//! Computes the build plan: a topological order of files in which every
//! file comes after the files it depends on.

use crate::core::graph::DependencyGraph;
use crate::core::walker::SourceFile;
use crate::error::ResolveError;

/// Visit state of a file during the depth-first walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the active path
    Active,
    Done,
}

/// Ordered files, dependencies first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    files: Vec<SourceFile>,
}

impl BuildPlan {
    /// Files in build order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Relative paths in build order
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the plan is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compute topological order as discovery indices
///
/// Roots are taken in discovery order and edges in require order, so the
/// result depends only on the input. The walk keeps its own stack instead
/// of recursing; reaching a file that is still on that stack is a cycle,
/// reported from the repeated file to the end of the active path.
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<usize>, ResolveError> {
    let count = graph.len();
    let mut marks = vec![Mark::Unvisited; count];
    let mut order = Vec::with_capacity(count);
    // (file, index of the next edge to follow)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..count {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::Active;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&dep) = graph.dependencies(node).get(frame.1) else {
                marks[node] = Mark::Done;
                order.push(node);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[dep] {
                Mark::Unvisited => {
                    marks[dep] = Mark::Active;
                    stack.push((dep, 0));
                }
                Mark::Active => {
                    let from = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                    let cycle = stack[from..]
                        .iter()
                        .map(|&(n, _)| graph.files()[n].path.clone())
                        .collect();
                    return Err(ResolveError::CyclicDependency { cycle });
                }
                Mark::Done => {}
            }
        }
    }

    Ok(order)
}

/// Resolve a graph into a build plan
pub fn resolve(graph: DependencyGraph) -> Result<BuildPlan, ResolveError> {
    let order = topological_order(&graph)?;
    tracing::debug!(
        "Resolved {} file(s) with {} edge(s)",
        graph.len(),
        graph.edge_count()
    );

    let mut slots: Vec<Option<SourceFile>> = graph.into_files().into_iter().map(Some).collect();
    let files = order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect();
    Ok(BuildPlan { files })
}
