//! Graph → YAML exporter.

use ahash::AHashMap;
use itertools::Itertools;

use crate::codec::schema;
use crate::error::ExportError;
use crate::graph::{ActionConfig, GraphNode, NodeKind, SubDagConfig, WorkflowGraph};
use crate::model::{Step, WorkflowMetadata};

/// Serializes the graph to the YAML workflow schema.
///
/// Validation runs first and aggregates every unconfigured node into one
/// error, so the editor can highlight all of them at once; no partial YAML is
/// ever produced. Dependency cycles are likewise rejected before rendering.
pub fn export_workflow(
    graph: &WorkflowGraph,
    metadata: &WorkflowMetadata,
) -> Result<String, ExportError> {
    let unconfigured: Vec<String> = graph
        .nodes
        .iter()
        .filter(|node| !is_configured(node))
        .map(GraphNode::label)
        .collect();
    if !unconfigured.is_empty() {
        return Err(ExportError::UnconfiguredNodes {
            labels: unconfigured,
        });
    }

    let steps = collect_steps(graph);
    detect_cycle(&steps)?;

    let doc = schema::document_from(metadata, steps);
    serde_yaml::to_string(&doc).map_err(|e| ExportError::Serialize(e.to_string()))
}

fn is_configured(node: &GraphNode) -> bool {
    match &node.kind {
        NodeKind::Trigger(_) => true,
        NodeKind::Action(config) => config.is_configured(),
        NodeKind::Condition(config) => config.is_configured(),
        NodeKind::SubDag(config) => config.is_configured(),
    }
}

/// Walks the step nodes (actions and sub-workflows) in graph order and
/// resolves their document form:
/// dependency names from recorded node ids plus the sources of any condition
/// nodes feeding them, and the conditions' gates as preconditions.
fn collect_steps(graph: &WorkflowGraph) -> Vec<Step> {
    let names_by_id: AHashMap<&str, &str> = graph
        .nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Action(config) => Some((node.id.as_str(), config.name.as_str())),
            NodeKind::SubDag(config) => Some((node.id.as_str(), config.name.as_str())),
            _ => None,
        })
        .collect();

    // Each condition node's unique upstream regular node; the mutation layer
    // forbids condition fan-in, so the first non-condition source is the one.
    let condition_sources: AHashMap<&str, &GraphNode> = graph
        .nodes
        .iter()
        .filter(|node| node.is_condition())
        .filter_map(|condition| {
            graph
                .edges_into(&condition.id)
                .filter_map(|edge| graph.node(&edge.source))
                .find(|source| !source.is_condition())
                .map(|source| (condition.id.as_str(), source))
        })
        .collect();

    let mut steps = Vec::new();
    for node in &graph.nodes {
        let (mut step, recorded_deps) = match &node.kind {
            NodeKind::Action(config) => (step_from_action(config), &config.depends_on),
            NodeKind::SubDag(config) => (step_from_sub_dag(config), &config.depends_on),
            _ => continue,
        };

        let explicit = recorded_deps
            .iter()
            .filter_map(|id| names_by_id.get(id.as_str()).copied());

        // Conditions feeding this node contribute their source's name as a
        // dependency (unless the source is the trigger) and their gate as a
        // precondition.
        let mut via_conditions = Vec::new();
        for upstream in graph.edges_into(&node.id) {
            let Some(condition) = graph.node(&upstream.source) else {
                continue;
            };
            let NodeKind::Condition(condition_config) = &condition.kind else {
                continue;
            };
            if let Some(precondition) = condition_config.next_nodes.get(&node.id) {
                step.preconditions.push(precondition.clone());
            }
            if let Some(source) = condition_sources.get(condition.id.as_str())
                && let Some(name) = names_by_id.get(source.id.as_str())
            {
                via_conditions.push(*name);
            }
        }

        step.depends_on = explicit
            .chain(via_conditions)
            .map(str::to_string)
            .unique()
            .collect();
        steps.push(step);
    }
    steps
}

fn step_from_action(config: &ActionConfig) -> Step {
    Step {
        name: config.name.clone(),
        description: config.description.clone(),
        script_kind: config.script_kind,
        script: config.script.clone(),
        interpreter_ref: config.interpreter_ref.clone(),
        output: config.output.clone(),
        retry_policy: config.retry_policy,
        continue_on: config.continue_on,
        mail_on: config.mail_on,
        ..Step::default()
    }
}

fn step_from_sub_dag(config: &SubDagConfig) -> Step {
    Step {
        name: config.name.clone(),
        run: Some(config.run.clone()),
        params: (!config.params.trim().is_empty()).then(|| config.params.clone()),
        ..Step::default()
    }
}

/// Depth-first cycle check over the resolved dependency names.
fn detect_cycle(steps: &[Step]) -> Result<(), ExportError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    let dependencies: AHashMap<&str, &[String]> = steps
        .iter()
        .map(|s| (s.name.as_str(), s.depends_on.as_slice()))
        .collect();

    fn visit<'a>(
        name: &'a str,
        dependencies: &AHashMap<&'a str, &'a [String]>,
        marks: &mut AHashMap<&'a str, Mark>,
        trail: &mut Vec<&'a str>,
    ) -> Result<(), ExportError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = trail.iter().position(|n| *n == name).unwrap_or(0);
                let mut names: Vec<String> = trail[start..].iter().map(|n| n.to_string()).collect();
                names.push(name.to_string());
                return Err(ExportError::CyclicDependency { names });
            }
            None => {}
        }
        marks.insert(name, Mark::InProgress);
        trail.push(name);
        if let Some(deps) = dependencies.get(name) {
            for dependency in deps.iter() {
                if dependencies.contains_key(dependency.as_str()) {
                    visit(dependency, dependencies, marks, trail)?;
                }
            }
        }
        trail.pop();
        marks.insert(name, Mark::Done);
        Ok(())
    }

    let mut marks = AHashMap::new();
    let mut trail = Vec::new();
    for step in steps {
        visit(&step.name, &dependencies, &mut marks, &mut trail)?;
    }
    Ok(())
}
