// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// the simplification workflow: run the passes in order and keep a report of each
//

use super::bubble::BubbleVisitor;
use super::error_filter::ErrorFilterVisitor;
use super::graph::{GraphError, GraphVisitor, StringGraph};
use super::graph_stats::{GraphStats, GraphStatsVisitor};
use super::trans_reduction::TransitiveReductionVisitor;
use super::trim::{IslandVisitor, TrimVisitor};
use super::variant::VariantVisitor;
use super::Parameters;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SimplifyStep {
    TransitiveReduction,
    Trim,
    Island,
    Bubble,
    Variant,
    ErrorFilter(f64),
    Stats,
}

impl SimplifyStep {
    pub fn name(&self) -> &'static str {
        match self {
            SimplifyStep::TransitiveReduction => "transitive reduction",
            SimplifyStep::Trim => "trim",
            SimplifyStep::Island => "island removal",
            SimplifyStep::Bubble => "bubble popping",
            SimplifyStep::Variant => "variant inference",
            SimplifyStep::ErrorFilter(_) => "error filter",
            SimplifyStep::Stats => "stats",
        }
    }

    pub fn visitor(&self) -> Box<dyn GraphVisitor> {
        match *self {
            SimplifyStep::TransitiveReduction => Box::new(TransitiveReductionVisitor::default()),
            SimplifyStep::Trim => Box::new(TrimVisitor::default()),
            SimplifyStep::Island => Box::new(IslandVisitor::default()),
            SimplifyStep::Bubble => Box::new(BubbleVisitor::default()),
            SimplifyStep::Variant => Box::new(VariantVisitor::default()),
            SimplifyStep::ErrorFilter(rate) => Box::new(ErrorFilterVisitor::new(rate)),
            SimplifyStep::Stats => Box::new(GraphStatsVisitor::default()),
        }
    }

    pub fn run(&self, g: &mut StringGraph) -> PassReport {
        let vertices_before = g.num_vertices();
        let edges_before = g.num_edges();
        let mut visitor = self.visitor();
        let modified = g.visit(visitor.as_mut());
        let report = PassReport {
            step: *self,
            changed: modified
                || vertices_before != g.num_vertices()
                || edges_before != g.num_edges(),
            vertices_before,
            vertices_after: g.num_vertices(),
            edges_before,
            edges_after: g.num_edges(),
        };
        log::info!(
            "{}: vertices {} -> {}, edges {} -> {}",
            self.name(),
            report.vertices_before,
            report.vertices_after,
            report.edges_before,
            report.edges_after
        );
        report
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassReport {
    pub step: SimplifyStep,
    pub changed: bool,
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub edges_before: usize,
    pub edges_after: usize,
}

#[derive(Debug, Default)]
pub struct SimplifySummary {
    pub passes: Vec<PassReport>,
    pub stats: GraphStats,
}

impl SimplifySummary {
    pub fn count(&self, step: SimplifyStep) -> usize {
        self.passes.iter().filter(|p| p.step == step).count()
    }
}

fn run_step(
    g: &mut StringGraph,
    step: SimplifyStep,
    params: &Parameters,
    summary: &mut SimplifySummary,
) -> Result<bool, GraphError> {
    let report = step.run(g);
    if params.validate {
        g.validate()?;
    }
    summary.passes.push(report);
    Ok(report.changed)
}

pub fn simplify(g: &mut StringGraph, params: &Parameters) -> Result<SimplifySummary, GraphError> {
    let mut summary = SimplifySummary::default();
    log::info!("simplify: {}", g);
    g.sort_adjacency_by_len();

    run_step(g, SimplifyStep::TransitiveReduction, params, &mut summary)?;

    for _ in 0..params.trim_rounds {
        if !run_step(g, SimplifyStep::Trim, params, &mut summary)? {
            break;
        }
    }
    run_step(g, SimplifyStep::Island, params, &mut summary)?;

    if params.variant {
        // inferred edges may be transitive
        run_step(g, SimplifyStep::Variant, params, &mut summary)?;
        run_step(g, SimplifyStep::TransitiveReduction, params, &mut summary)?;
    }

    if params.bubble {
        while run_step(g, SimplifyStep::Bubble, params, &mut summary)? {}
    }

    if params.max_error_rate < 1.0 {
        run_step(
            g,
            SimplifyStep::ErrorFilter(params.max_error_rate),
            params,
            &mut summary,
        )?;
    }

    let mut stats = GraphStatsVisitor::default();
    g.visit(&mut stats);
    summary.stats = stats.stats();
    log::info!("simplify done: {} after {} passes", g, summary.passes.len());
    Ok(summary)
}
