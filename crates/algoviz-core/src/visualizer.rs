//! The visualization session: shared data plus the run lifecycle around it.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::catalog::{Family, RunKind};
use crate::config::VisConfig;
use crate::context::RunContext;
use crate::control::{ControlStatus, RunController};
use crate::error::{Cancelled, Error, Result};
use crate::graph::{Graph, Traversal, TraversalKind};
use crate::greedy::{random_items, HuffmanTree, KnapsackItem, KnapsackSolution};
use crate::port::{Emphasis, RenderPort};
use crate::request::RunRequest;
use crate::sequence::{quick_sort, random_sequence, SearchKind, SortKind};

/// One visualization session.
///
/// Owns the sequence and graph that runs mutate, so holding `&mut Visualizer`
/// is what serializes runs. The [`RunController`] is shared separately for
/// pause/resume/stop from outside the run.
pub struct Visualizer {
    config: VisConfig,
    control: Arc<RunController>,
    port: Arc<dyn RenderPort>,
    sequence: Vec<f64>,
    graph: Graph,
    family: Family,
    rng: StdRng,
}

impl Visualizer {
    /// New session with fresh random data.
    pub fn new(config: VisConfig, port: Arc<dyn RenderPort>) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sequence = random_sequence(&mut rng, config.sequence_len, config.max_value);
        let graph = Graph::random(&mut rng, config.surface_width, config.surface_height);
        let control = Arc::new(RunController::new());
        control.set_step(config.step());

        Ok(Self {
            config,
            control,
            port,
            sequence,
            graph,
            family: Family::Sequence,
            rng,
        })
    }

    pub fn config(&self) -> &VisConfig {
        &self.config
    }

    /// Shared handle for pause/resume/stop.
    pub fn control(&self) -> Arc<RunController> {
        self.control.clone()
    }

    pub fn status(&self) -> ControlStatus {
        self.control.status()
    }

    pub fn sequence(&self) -> &[f64] {
        &self.sequence
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Family currently on the surface.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Validate `request` against the session and start its run.
    ///
    /// The run is live from here on: pause, stop and supersede apply to it
    /// even before [`Visualizer::execute`] is polled. Rejected requests do
    /// not touch the controller.
    pub fn begin(&mut self, request: &RunRequest) -> Result<RunContext> {
        if let Err(e) = self.admit(request) {
            warn!(kind = %request.kind(), %e, "run rejected");
            return Err(e);
        }
        Ok(self.start(request.kind()))
    }

    /// Drive a run started by [`Visualizer::begin`] to its end.
    pub async fn execute(&mut self, ctx: RunContext, request: RunRequest) -> Result<()> {
        let result = match request {
            RunRequest::Sort(kind) => self.sort(&ctx, kind).await,
            RunRequest::Search { kind, target } => self.search(&ctx, kind, target).await.map(drop),
            RunRequest::Traverse {
                kind,
                source,
                destination,
            } => kind
                .run(&ctx, &mut self.graph, source, destination)
                .await
                .map(drop),
            RunRequest::Huffman { text } => {
                let text = text.unwrap_or_else(|| self.config.huffman_text.clone());
                match HuffmanTree::build(&text) {
                    Ok(tree) => {
                        tree.present(&ctx).await;
                        self.settle_presentation(&ctx);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            RunRequest::Knapsack { capacity } => {
                let items = random_items(&mut self.rng, self.config.knapsack_items);
                let capacity = capacity.unwrap_or(self.config.knapsack_capacity);
                match KnapsackSolution::solve(&items, capacity) {
                    Ok(solution) => {
                        solution.present(&ctx).await;
                        self.settle_presentation(&ctx);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
        };
        self.conclude(&ctx, result)
    }

    fn admit(&self, request: &RunRequest) -> Result<()> {
        request.check_input()?;
        if let RunRequest::Traverse {
            source,
            destination,
            ..
        } = request
        {
            self.graph.validate_node(*source, "source")?;
            self.graph.validate_node(*destination, "destination")?;
        }
        Ok(())
    }

    fn start(&mut self, kind: RunKind) -> RunContext {
        self.family = kind.family();
        let ctx = RunContext::start(self.control.clone(), kind, self.port.clone());
        info!(%kind, generation = ctx.token().generation(), "run started");
        ctx
    }

    /// Log the outcome, apply the stop reset, and release the session.
    fn conclude<T>(&mut self, ctx: &RunContext, result: Result<T>) -> Result<T> {
        let kind = ctx.kind();
        match &result {
            Ok(_) => info!(%kind, "run finished"),
            Err(Error::Cancelled(Cancelled::Stopped)) => {
                debug!(%kind, "run stopped");
                self.reset_visuals(kind.family());
            }
            Err(Error::Cancelled(Cancelled::Superseded)) => {
                debug!(%kind, "run superseded");
            }
            Err(e) => error!(%kind, error = %e, "run failed"),
        }
        ctx.finish();
        result
    }

    /// A presentation ignores stop while it plays; a stop issued meanwhile
    /// still clears the surface once it is over.
    fn settle_presentation(&mut self, ctx: &RunContext) {
        if let Err(Error::Cancelled(Cancelled::Stopped)) = ctx.check() {
            debug!(kind = %ctx.kind(), "stopped during presentation");
            self.reset_visuals(Family::Greedy);
        }
    }

    async fn sort(&mut self, ctx: &RunContext, kind: SortKind) -> Result<()> {
        kind.run(ctx, &mut self.sequence).await?;
        self.port.render_sequence(&self.sequence, &[], Emphasis::Done);
        Ok(())
    }

    async fn search(&mut self, ctx: &RunContext, kind: SearchKind, target: i64) -> Result<Option<usize>> {
        let snapshot = self.sequence.clone();

        let result = async {
            if kind.requires_sorted() {
                quick_sort(ctx, &mut self.sequence).await?;
            }
            kind.run(ctx, &self.sequence, target).await
        }
        .await;

        if kind.requires_sorted() {
            self.sequence = snapshot;
        }

        if let Ok(found) = &result {
            if kind.requires_sorted() {
                self.port.render_sequence(&self.sequence, &[], Emphasis::Neutral);
            }
            let message = match found {
                Some(index) => format!("Found {} at index {}", target, index),
                None => format!("{} not found in the array", target),
            };
            self.port.render_message(&message);
        }
        result
    }

    /// Sort the sequence in place.
    pub async fn run_sort(&mut self, kind: SortKind) -> Result<()> {
        let ctx = self.start(kind.into());
        let result = self.sort(&ctx, kind).await;
        self.conclude(&ctx, result)
    }

    /// Search the sequence for `target`.
    ///
    /// Binary and jump search first quick-sort the sequence, and the returned
    /// index is a position in that sorted order. The original order is put
    /// back afterwards whatever the outcome, cancellation included.
    pub async fn run_search(&mut self, kind: SearchKind, target: i64) -> Result<Option<usize>> {
        let ctx = self.start(kind.into());
        let result = self.search(&ctx, kind, target).await;
        self.conclude(&ctx, result)
    }

    /// Traverse the graph from `source` towards `destination`.
    pub async fn run_traversal(
        &mut self,
        kind: TraversalKind,
        source: usize,
        destination: usize,
    ) -> Result<Traversal> {
        let ctx = self.begin(&RunRequest::Traverse {
            kind,
            source,
            destination,
        })?;
        let result = kind.run(&ctx, &mut self.graph, source, destination).await;
        self.conclude(&ctx, result)
    }

    /// Build and present a Huffman tree for `text`, or the configured text.
    pub async fn run_huffman(&mut self, text: Option<&str>) -> Result<HuffmanTree> {
        let text = text.unwrap_or(&self.config.huffman_text).to_string();
        let tree = HuffmanTree::build(&text).inspect_err(|e| warn!(%e, "huffman rejected"))?;

        let ctx = self.start(RunKind::Huffman);
        tree.present(&ctx).await;
        self.settle_presentation(&ctx);
        self.conclude(&ctx, Ok(tree))
    }

    /// Solve a fractional knapsack over freshly generated items.
    pub async fn run_knapsack(&mut self, capacity: Option<f64>) -> Result<KnapsackSolution> {
        let items = random_items(&mut self.rng, self.config.knapsack_items);
        self.run_knapsack_with(&items, capacity).await
    }

    /// Solve and present a fractional knapsack over `items`.
    pub async fn run_knapsack_with(
        &mut self,
        items: &[KnapsackItem],
        capacity: Option<f64>,
    ) -> Result<KnapsackSolution> {
        let capacity = capacity.unwrap_or(self.config.knapsack_capacity);
        let solution = KnapsackSolution::solve(items, capacity)
            .inspect_err(|e| warn!(%e, "knapsack rejected"))?;

        let ctx = self.start(RunKind::Knapsack);
        solution.present(&ctx).await;
        self.settle_presentation(&ctx);
        self.conclude(&ctx, Ok(solution))
    }

    /// Replace the sequence with fresh random values and draw it.
    pub fn reset_sequence(&mut self) {
        self.sequence = random_sequence(
            &mut self.rng,
            self.config.sequence_len,
            self.config.max_value,
        );
        self.port.render_sequence(&self.sequence, &[], Emphasis::Neutral);
    }

    /// Change the number of bars and draw a fresh sequence of that length.
    pub fn set_sequence_len(&mut self, len: usize) -> Result<()> {
        let config = VisConfig {
            sequence_len: len,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        self.reset_sequence();
        Ok(())
    }

    /// Use `values` as the sequence.
    pub fn set_sequence(&mut self, values: Vec<f64>) -> Result<()> {
        if values.is_empty() {
            return Err(Error::invalid("sequence must not be empty"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("sequence values must be finite"));
        }
        self.sequence = values;
        self.port.render_sequence(&self.sequence, &[], Emphasis::Neutral);
        Ok(())
    }

    /// Replace the graph with a fresh random one and draw it.
    pub fn generate_graph(&mut self) {
        self.graph = Graph::random(
            &mut self.rng,
            self.config.surface_width,
            self.config.surface_height,
        );
        debug!(nodes = self.graph.node_count(), edges = self.graph.edges().len(), "graph generated");
        self.port.render_graph(self.graph.nodes(), self.graph.edges());
    }

    /// Use `graph` as the graph.
    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.port.render_graph(self.graph.nodes(), self.graph.edges());
    }

    /// Put the surface for `family` back into its neutral state.
    pub fn reset_visuals(&mut self, family: Family) {
        match family {
            Family::Sequence => {
                self.port.render_sequence(&self.sequence, &[], Emphasis::Neutral);
            }
            Family::Graph => {
                self.graph.reset_tags();
                self.port.render_graph(self.graph.nodes(), self.graph.edges());
            }
            Family::Greedy => self.port.clear(),
        }
    }

    /// Stop whatever is running and reset the surface.
    pub fn stop(&mut self) {
        let family = self.control.stop().unwrap_or(self.family);
        self.reset_visuals(family);
    }

    /// Stop any run and show fresh data for `family`.
    pub fn switch_family(&mut self, family: Family) {
        self.control.stop();
        self.family = family;
        match family {
            Family::Sequence => self.reset_sequence(),
            Family::Graph => self.generate_graph(),
            Family::Greedy => self.port.clear(),
        }
    }
}

impl std::fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("config", &self.config)
            .field("family", &self.family)
            .field("sequence_len", &self.sequence.len())
            .field("nodes", &self.graph.node_count())
            .finish_non_exhaustive()
    }
}
