//! YAML → graph importer.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::codec::{layout, schema};
use crate::error::{ImportWarning, ParseError};
use crate::graph::{
    ActionConfig, ConditionConfig, GraphEdge, GraphNode, NodeId, NodeKind, Position, SubDagConfig,
    TriggerConfig, WorkflowGraph,
};
use crate::model::{Step, WorkflowMetadata};

/// Result of a successful import: workflow metadata, the positioned graph,
/// and any non-fatal findings (dangling dependencies, duplicate step names).
#[derive(Debug, Clone)]
pub struct ImportedWorkflow {
    pub metadata: WorkflowMetadata,
    pub graph: WorkflowGraph,
    pub warnings: Vec<ImportWarning>,
}

/// Parses a YAML workflow document into a positioned graph.
///
/// Optional document fields default to empty values; the only fatal inputs
/// are invalid YAML and a document without a `steps` section. A step naming a
/// nonexistent dependency loses that connection and the loss is reported in
/// `warnings` rather than silently dropped.
pub fn import_workflow(yaml: &str) -> Result<ImportedWorkflow, ParseError> {
    let doc = schema::parse_document(yaml)?;
    let metadata = schema::metadata_from_doc(&doc);
    let steps: Vec<Step> = doc
        .steps
        .ok_or(ParseError::MissingSteps)?
        .into_iter()
        .map(schema::StepDoc::into_step)
        .collect();

    let mut graph = WorkflowGraph::new();
    let mut warnings = Vec::new();

    let trigger_id: NodeId = "trigger".to_string();
    graph.add_node(GraphNode::new(
        trigger_id.clone(),
        Position::default(),
        NodeKind::Trigger(TriggerConfig {
            schedule: metadata.schedule.clone(),
        }),
    ));

    // First pass: one node per step, and the name -> node id lookup. Steps
    // that run another workflow become sub-workflow nodes.
    let mut ids_by_name: AHashMap<String, NodeId> = AHashMap::new();
    let mut step_node_ids = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let node_id = format!("step-{}", index + 1);
        if ids_by_name
            .insert(step.name.clone(), node_id.clone())
            .is_some()
        {
            warn!(step = %step.name, "duplicate step name");
            warnings.push(ImportWarning::DuplicateStepName {
                name: step.name.clone(),
            });
        }
        let kind = match &step.run {
            Some(run) => NodeKind::SubDag(SubDagConfig {
                name: step.name.clone(),
                run: run.clone(),
                params: step.params.clone().unwrap_or_default(),
                depends_on: Vec::new(),
            }),
            None => NodeKind::Action(ActionConfig {
                name: step.name.clone(),
                description: step.description.clone(),
                script_kind: step.script_kind,
                script: step.script.clone(),
                interpreter_ref: step.interpreter_ref.clone(),
                output: step.output.clone(),
                depends_on: Vec::new(),
                retry_policy: step.retry_policy,
                continue_on: step.continue_on,
                mail_on: step.mail_on,
            }),
        };
        graph.add_node(GraphNode::new(node_id.clone(), Position::default(), kind));
        step_node_ids.push(node_id);
    }

    // Second pass: edges, with condition nodes spliced in for preconditions.
    let mut condition_seq = 0usize;
    for (step, node_id) in steps.iter().zip(&step_node_ids) {
        let mut sources: Vec<NodeId> = Vec::new();
        if step.depends_on.is_empty() {
            sources.push(trigger_id.clone());
        } else {
            for dependency in &step.depends_on {
                match ids_by_name.get(dependency) {
                    Some(source_id) => sources.push(source_id.clone()),
                    None => {
                        warn!(step = %step.name, depends_on = %dependency, "dropping dangling dependency");
                        warnings.push(ImportWarning::DanglingDependency {
                            step: step.name.clone(),
                            depends_on: dependency.clone(),
                        });
                    }
                }
            }
        }

        let mut remaining = sources.into_iter();
        // Preconditions ride on the first resolved incoming edge; the trigger
        // edge counts, so dependency-free steps keep their gates too.
        if let Some(anchor) = remaining.next() {
            if step.preconditions.is_empty() {
                connect(&mut graph, &anchor, node_id);
            } else {
                for precondition in &step.preconditions {
                    condition_seq += 1;
                    let condition_id = format!("condition-{condition_seq}");
                    let mut next_nodes = AHashMap::new();
                    next_nodes.insert(node_id.clone(), precondition.clone());
                    graph.add_node(GraphNode::new(
                        condition_id.clone(),
                        Position::default(),
                        NodeKind::Condition(ConditionConfig {
                            name: condition_id.clone(),
                            next_nodes,
                        }),
                    ));
                    connect(&mut graph, &anchor, &condition_id);
                    connect(&mut graph, &condition_id, node_id);
                }
            }
        }
        for source in remaining {
            connect(&mut graph, &source, node_id);
        }
    }

    layout::assign_layout(&mut graph);
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        warnings = warnings.len(),
        "imported workflow"
    );

    Ok(ImportedWorkflow {
        metadata,
        graph,
        warnings,
    })
}

/// Adds an edge and, when the source is another step node, records the
/// dependency by node id on the target's config.
fn connect(graph: &mut WorkflowGraph, source: &str, target: &str) {
    if graph.add_edge(GraphEdge::between(source, target)).is_err() {
        // Duplicate connections from repeated document entries are harmless.
        return;
    }
    let records_dependency = graph
        .node(source)
        .is_some_and(|n| !n.is_trigger() && !n.is_condition());
    if records_dependency
        && let Some(node) = graph.node_mut(target)
        && let Some(depends_on) = node.kind.depends_on_mut()
        && !depends_on.iter().any(|id| id == source)
    {
        depends_on.push(source.to_string());
    }
}
