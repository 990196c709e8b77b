//! Exploration loop.
//!
//! [`Explorer`] is an iterator: every call to `next()` runs one complete
//! iteration and yields its [`ProgressEvent`], or the final status.
//!
//! ```text
//!  SENSE ─► UPDATE ─► COVERAGE ─► PLAN ─► LOOK-AHEAD ─► ASSERT
//!                                  │                       │
//!                                  ▼                       ▼
//!                           no frontiers /          SELECT ─► NAVIGATE
//!                           threshold: stop                      │
//!                                                                ▼
//!                                     event ◄─ MOVE ◄─ SWITCH (cooldown,
//!                                                      anti-yoyo, loop)
//! ```
//!
//! The known map and graph live behind `Arc`s. Events share them and the
//! explorer copies on its next write, so consumers see a frozen snapshot.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indexmap::IndexSet;

use super::config::ExplorationConfig;
use super::event::{ExplorationSummary, ExploreStatus, ProgressEvent, TerminationReason};
use super::history::{StallTracker, TargetHistory, Trail};
use crate::core::{CellState, Direction, Position};
use crate::diagnostics::{DiagnosticContext, DiagnosticKind, DiagnosticReport};
use crate::error::{ConfigError, ExplorationError};
use crate::frontier::{Frontier, FrontierDetector, FrontierScan};
use crate::graph::{ComponentGraph, ComponentKey};
use crate::grid::{Grid, reveal, walkable_changes};
use crate::pathfinding::{HierarchicalPath, HierarchicalPlanner};
use crate::sensor::{ConeSensor, Sensor};
use crate::world::World;

/// Costs closer than this are treated as equal.
const COST_EPSILON: f32 = 1e-4;

enum Flow {
    Progress(Box<ProgressEvent>),
    Done(TerminationReason),
}

/// Frontier exploration over an unknown grid.
pub struct Explorer<S: Sensor = ConeSensor> {
    config: ExplorationConfig,
    truth: Grid,
    truth_walkable: usize,
    sensor: S,
    detector: FrontierDetector,
    planner: HierarchicalPlanner,
    known: Arc<Grid>,
    graph: Arc<ComponentGraph>,
    pose: Position,
    heading: Direction,
    iteration: usize,
    target: Option<Position>,
    last_switch: Option<usize>,
    switches: usize,
    trail: Trail,
    history: TargetHistory,
    stall: StallTracker,
    delay: Duration,
    outcome: Option<TerminationReason>,
    finished: bool,
}

impl Explorer<ConeSensor> {
    /// Create an explorer with a cone sensor of the configured range.
    pub fn new(world: &World, config: ExplorationConfig) -> Result<Self, ConfigError> {
        let sensor = ConeSensor::new(config.sensor_range);
        Self::with_sensor(world, config, sensor)
    }
}

impl<S: Sensor> Explorer<S> {
    /// Create an explorer with a custom sensor.
    ///
    /// Validates the configuration against the world size.
    pub fn with_sensor(
        world: &World,
        config: ExplorationConfig,
        sensor: S,
    ) -> Result<Self, ConfigError> {
        let layout = config.validate(world.size())?;

        log::info!(
            "[Explore] {}x{} grid, {} regions of {}, start {} facing {}, strategy {}, heuristic {}",
            world.size(),
            world.size(),
            layout.regions_per_side() * layout.regions_per_side(),
            layout.region_size(),
            world.start(),
            world.heading(),
            config.frontier_strategy,
            config.heuristic
        );

        Ok(Self {
            truth: world.truth().clone(),
            truth_walkable: world.walkable_count(),
            sensor,
            detector: FrontierDetector::new(config.frontier_strategy, config.use_wfd),
            planner: HierarchicalPlanner::new(config.heuristic),
            known: Arc::new(Grid::unknown(world.size())),
            graph: Arc::new(ComponentGraph::new(layout)),
            pose: world.start(),
            heading: world.heading(),
            iteration: 0,
            target: None,
            last_switch: None,
            switches: 0,
            trail: Trail::new(config.trail_capacity),
            history: TargetHistory::new(config.history_capacity),
            stall: StallTracker::default(),
            delay: Duration::from_millis(config.step_delay_ms),
            outcome: None,
            finished: false,
            config,
        })
    }

    /// Current pose
    pub fn pose(&self) -> Position {
        self.pose
    }

    /// Current heading
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Completed iterations
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current target
    pub fn target(&self) -> Option<Position> {
        self.target
    }

    /// Robot's known map
    pub fn known(&self) -> &Grid {
        &self.known
    }

    /// Ground truth
    pub fn truth(&self) -> &Grid {
        &self.truth
    }

    /// Component graph of the known map
    pub fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    /// Replaced targets, oldest first
    pub fn history(&self) -> &TargetHistory {
        &self.history
    }

    /// Recent poses, oldest first
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Configuration in use
    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    /// Known-walkable / truth-walkable, percent.
    pub fn coverage(&self) -> f32 {
        if self.truth_walkable == 0 {
            return 100.0;
        }
        self.known.count(CellState::Walkable) as f32 / self.truth_walkable as f32 * 100.0
    }

    /// Drive the loop to completion.
    pub fn run(mut self) -> Result<ExplorationSummary, ExplorationError> {
        while let Some(status) = self.next() {
            match status {
                ExploreStatus::InProgress(_) => {}
                ExploreStatus::Complete(reason) => return Ok(self.summary(reason)),
                ExploreStatus::Failed(e) => return Err(e),
            }
        }
        let reason = self.outcome.unwrap_or(TerminationReason::MaxIterations);
        Ok(self.summary(reason))
    }

    /// Summary of the run so far, closed with `reason`.
    pub fn summary(&self, reason: TerminationReason) -> ExplorationSummary {
        ExplorationSummary {
            reason,
            iterations: self.iteration,
            coverage: self.coverage(),
            pose: self.pose,
            last_target: self.history.last(),
            switches: self.switches,
            nodes: self.graph.len(),
        }
    }

    /// One full iteration, stages (a) to (k).
    fn iterate(&mut self) -> Result<Flow, ExplorationError> {
        if self.iteration >= self.config.max_iterations {
            return Ok(Flow::Done(TerminationReason::MaxIterations));
        }
        let mut hits = IndexSet::new();

        // SENSE + UPDATE
        self.sense(&mut hits);

        let coverage = self.coverage();

        // PLAN
        let scan = self.detect();
        if scan.is_exhausted() {
            return self.wind_down(TerminationReason::NoFrontiers, hits);
        }
        if coverage >= self.config.exploration_threshold {
            return self.wind_down(TerminationReason::CoverageReached, hits);
        }
        let mut frontiers = self.surface(scan, &mut hits);
        if frontiers.is_empty() {
            return self.wind_down(TerminationReason::NoFrontiers, hits);
        }

        // LOOK-AHEAD
        if let Some(target) = self.target
            && frontiers.iter().any(|f| f.target == target)
            && let Some(desired) = Direction::toward(self.pose, target)
            && desired != self.heading
        {
            self.rotate_to(desired, &mut hits);
            let scan = self.detect();
            frontiers = self.surface(scan, &mut hits);
            if frontiers.is_empty() {
                return self.wind_down(TerminationReason::NoFrontiers, hits);
            }
        }

        // ASSERT: every surfaced frontier is reachable in the graph
        let robot = self.robot_component(frontiers.len())?;
        let reach = self.graph.reachable_from(robot);
        if let Some(bad) = frontiers.iter().find(|f| !reach.contains(f.component)) {
            let report = self.report(
                DiagnosticKind::UnreachableFrontier,
                Some(bad.target),
                frontiers.len(),
            );
            return Err(ExplorationError::UnreachableFrontier(Box::new(report)));
        }

        // SELECT
        let kept = self
            .target
            .and_then(|t| frontiers.iter().find(|f| f.target == t));
        if let Some(old) = self.target
            && kept.is_none()
        {
            log::debug!("[Explore] target {} is no longer a frontier", old);
            self.history.push(old);
            self.stall.reset();
        }

        // NAVIGATE
        let (chosen, mut plan, fresh) = match kept {
            Some(f) => (f.clone(), self.plan_to(f, frontiers.len())?, false),
            None => match self.select_target(&frontiers)? {
                Some((f, plan)) => (f, plan, true),
                None => return Ok(Flow::Done(TerminationReason::NoFrontiers)),
            },
        };
        self.target = Some(chosen.target);
        if fresh {
            log::debug!(
                "[Explore] iter {}: target {} in {} (cost {:.2})",
                self.iteration,
                chosen.target,
                chosen.component,
                plan.cost()
            );
        }

        // SWITCH
        self.stall.observe(chosen.target, plan.cost());
        let stuck = self.trail.is_oscillating() && self.stall.is_stalled();
        if stuck {
            log::debug!("[Explore] loop detected near {}", self.pose);
        }
        let mut switched = false;
        if !fresh
            && self.cooldown_elapsed()
            && let Some((next, next_plan)) =
                self.cheaper_alternative(&frontiers, chosen.target, plan.cost(), stuck)?
        {
            log::info!(
                "[Explore] iter {}: switching target {} -> {} (cost {:.2} -> {:.2}{})",
                self.iteration,
                chosen.target,
                next.target,
                plan.cost(),
                next_plan.cost(),
                if stuck { ", stuck" } else { "" }
            );
            self.history.push(chosen.target);
            self.target = Some(next.target);
            self.last_switch = Some(self.iteration);
            self.switches += 1;
            self.stall.reset();
            self.stall.observe(next.target, next_plan.cost());
            plan = next_plan;
            switched = true;
        }

        Ok(self.advance(plan, frontiers, hits, switched, stuck))
    }

    /// MOVE along `plan` and package the iteration as an event.
    fn advance(
        &mut self,
        plan: HierarchicalPath,
        frontiers: Vec<Frontier>,
        mut hits: IndexSet<Position>,
        switched: bool,
        stuck: bool,
    ) -> Flow {
        if plan.len() > 1 {
            let stride = self.config.step_size.min(plan.len() - 1);
            for &next in &plan.detailed_path[1..=stride] {
                let Some(heading) = Direction::toward(self.pose, next) else {
                    continue;
                };
                self.pose = next;
                self.rotate_to(heading, &mut hits);
                self.trail.push(next);
            }
        }
        if plan.len() <= 1 || self.target == Some(self.pose) {
            self.arrive(&mut hits);
        }

        let event = ProgressEvent {
            iteration: self.iteration,
            pose: self.pose,
            heading: self.heading,
            coverage: self.coverage(),
            known: Arc::clone(&self.known),
            graph: Arc::clone(&self.graph),
            frontiers,
            target: self.target,
            sensor_hits: hits.into_iter().collect(),
            actual_end: Some(plan.actual_end),
            path: plan.detailed_path,
            switched,
            stuck,
            delay: self.delay,
        };
        self.iteration += 1;
        Flow::Progress(Box::new(event))
    }

    /// A stop condition holds. With a target still ahead, the robot first
    /// finishes that leg, so a run ends on the last frontier it went for.
    fn wind_down(
        &mut self,
        reason: TerminationReason,
        hits: IndexSet<Position>,
    ) -> Result<Flow, ExplorationError> {
        let Some(target) = self.target.filter(|t| *t != self.pose) else {
            return Ok(Flow::Done(reason));
        };
        let Some(component) = self.graph.component_at(target) else {
            return Ok(Flow::Done(reason));
        };

        log::debug!("[Explore] {}, finishing leg to {}", reason, target);
        let leg = Frontier {
            target,
            component,
            cells: vec![target],
        };
        let plan = self.plan_to(&leg, 0)?;
        Ok(self.advance(plan, Vec::new(), hits, false, false))
    }

    /// Standing on the target: sweep if configured, then retire it.
    fn arrive(&mut self, hits: &mut IndexSet<Position>) {
        if self.config.scan_360_on_frontier {
            self.sense_360(hits);
        }
        if let Some(reached) = self.target.take() {
            log::debug!("[Explore] reached target {}", reached);
            self.history.push(reached);
        }
        self.stall.reset();
    }

    /// Read the sensor at the current heading and fold the result in.
    fn sense(&mut self, hits: &mut IndexSet<Position>) {
        let visible = self.sensor.visible(&self.truth, self.pose, self.heading);
        self.absorb(visible, hits);
    }

    fn sense_360(&mut self, hits: &mut IndexSet<Position>) {
        let visible = self.sensor.visible_360(&self.truth, self.pose);
        self.absorb(visible, hits);
    }

    /// Reveal cells in the known map and patch the graph.
    fn absorb(&mut self, visible: Vec<Position>, hits: &mut IndexSet<Position>) {
        let changes = reveal(
            Arc::make_mut(&mut self.known),
            &self.truth,
            visible.iter().copied(),
        );
        hits.extend(visible);

        let new_walkable = walkable_changes(&changes);
        if !new_walkable.is_empty() {
            Arc::make_mut(&mut self.graph).update(&self.known, &new_walkable);
        }
    }

    /// Turn along the shorter arc, sensing at every heading passed.
    fn rotate_to(&mut self, desired: Direction, hits: &mut IndexSet<Position>) {
        for heading in self.heading.rotation_to(desired) {
            self.heading = heading;
            self.sense(hits);
        }
    }

    fn detect(&self) -> FrontierScan {
        self.detector.detect(&self.known, &self.graph, self.pose)
    }

    /// Frontiers to act on.
    ///
    /// The group still holding the current target keeps it, even inside the
    /// near-pose radius. When everything else is within that radius, sweep
    /// 360° and re-detect; if that still leaves only near frontiers, surface
    /// them retargeted to their group cell nearest the pose.
    fn surface(&mut self, mut scan: FrontierScan, hits: &mut IndexSet<Position>) -> Vec<Frontier> {
        self.track_target(&mut scan);
        if !scan.frontiers.is_empty() || scan.suppressed.is_empty() {
            return scan.frontiers;
        }

        log::debug!(
            "[Explore] all {} frontiers near pose {}, scanning 360",
            scan.suppressed.len(),
            self.pose
        );
        self.sense_360(hits);
        let mut rescan = self.detect();
        self.track_target(&mut rescan);
        if !rescan.frontiers.is_empty() {
            return rescan.frontiers;
        }

        let pose = self.pose;
        rescan
            .suppressed
            .into_iter()
            .filter_map(|mut frontier| {
                let cell = frontier
                    .cells
                    .iter()
                    .copied()
                    .min_by_key(|c| c.chebyshev_distance(&pose))?;
                frontier.component = self.graph.component_at(cell)?;
                frontier.target = cell;
                Some(frontier)
            })
            .collect()
    }

    /// Pin the current target onto the group that still contains it.
    ///
    /// Representatives move as groups grow and shrink; without this a single
    /// large group hands out a new target every iteration.
    fn track_target(&self, scan: &mut FrontierScan) {
        let Some(target) = self.target.filter(|t| *t != self.pose) else {
            return;
        };
        let Some(component) = self.graph.component_at(target) else {
            return;
        };

        let holds = |f: &Frontier| f.cells.contains(&target);
        let (list, index) = if let Some(i) = scan.frontiers.iter().position(holds) {
            (&mut scan.frontiers, i)
        } else if let Some(i) = scan.suppressed.iter().position(holds) {
            (&mut scan.suppressed, i)
        } else {
            return;
        };
        let mut tracked = list.remove(index);
        tracked.target = target;
        tracked.component = component;

        scan.frontiers.retain(|f| f.target != target);
        scan.suppressed.retain(|f| f.target != target);
        let at = index.min(scan.frontiers.len());
        scan.frontiers.insert(at, tracked);
    }

    fn robot_component(&self, frontier_count: usize) -> Result<ComponentKey, ExplorationError> {
        self.graph.component_at(self.pose).ok_or_else(|| {
            let report = self.report(DiagnosticKind::PoseOutsideGraph, self.target, frontier_count);
            ExplorationError::PoseOutsideGraph(Box::new(report))
        })
    }

    /// Cheapest frontier by planned path cost, skipping recent targets
    /// unless nothing else is left. Ties go to the earlier frontier.
    ///
    /// Every candidate already passed the reachability check, so a planning
    /// failure on any of them is fatal.
    fn select_target(
        &self,
        frontiers: &[Frontier],
    ) -> Result<Option<(Frontier, HierarchicalPath)>, ExplorationError> {
        let fresh: Vec<&Frontier> = frontiers
            .iter()
            .filter(|f| !self.history.is_recent(f.target))
            .collect();
        let candidates = if fresh.is_empty() {
            log::debug!("[Explore] every frontier was recently abandoned, relaxing");
            frontiers.iter().collect()
        } else {
            fresh
        };

        let mut best: Option<(&Frontier, HierarchicalPath)> = None;
        for frontier in candidates {
            let plan = self.plan_to(frontier, frontiers.len())?;
            if best
                .as_ref()
                .is_none_or(|(_, b)| plan.cost() + COST_EPSILON < b.cost())
            {
                best = Some((frontier, plan));
            }
        }
        Ok(best.map(|(f, plan)| (f.clone(), plan)))
    }

    fn plan_to(
        &self,
        frontier: &Frontier,
        frontier_count: usize,
    ) -> Result<HierarchicalPath, ExplorationError> {
        self.planner
            .plan_into(
                &self.known,
                &self.graph,
                self.pose,
                frontier.target,
                frontier.component,
            )
            .map_err(|failure| {
                let report = self.report(
                    DiagnosticKind::PlanningMiss(failure.clone()),
                    Some(frontier.target),
                    frontier_count,
                );
                ExplorationError::PlanningMiss {
                    failure,
                    report: Box::new(report),
                }
            })
    }

    fn cooldown_elapsed(&self) -> bool {
        self.last_switch
            .is_none_or(|at| self.iteration - at >= self.config.target_switch_cooldown)
    }

    /// A non-recent frontier strictly cheaper than the current target, or
    /// the cheapest non-recent one when stuck.
    fn cheaper_alternative(
        &self,
        frontiers: &[Frontier],
        current: Position,
        current_cost: f32,
        stuck: bool,
    ) -> Result<Option<(Frontier, HierarchicalPath)>, ExplorationError> {
        let mut best: Option<(&Frontier, HierarchicalPath)> = None;
        for frontier in frontiers
            .iter()
            .filter(|f| f.target != current && !self.history.is_recent(f.target))
        {
            let plan = self.plan_to(frontier, frontiers.len())?;
            if best
                .as_ref()
                .is_none_or(|(_, b)| plan.cost() + COST_EPSILON < b.cost())
            {
                best = Some((frontier, plan));
            }
        }

        let Some((frontier, plan)) = best else {
            return Ok(None);
        };
        let better = stuck || plan.cost() + COST_EPSILON < current_cost;
        Ok(better.then(|| (frontier.clone(), plan)))
    }

    fn report(
        &self,
        kind: DiagnosticKind,
        target: Option<Position>,
        frontier_count: usize,
    ) -> DiagnosticReport {
        let ctx = DiagnosticContext {
            known: &self.known,
            truth: &self.truth,
            graph: &self.graph,
            sensor: &self.sensor,
            pose: self.pose,
            heading: self.heading,
            iteration: self.iteration,
            frontier_count,
        };
        DiagnosticReport::capture(ctx, kind, target)
    }
}

impl<S: Sensor> Iterator for Explorer<S> {
    type Item = ExploreStatus;

    fn next(&mut self) -> Option<ExploreStatus> {
        if self.finished {
            return None;
        }
        if self.iteration > 0 && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match self.iterate() {
            Ok(Flow::Progress(event)) => Some(ExploreStatus::InProgress(event)),
            Ok(Flow::Done(reason)) => {
                self.finished = true;
                self.outcome = Some(reason);
                log::info!(
                    "[Explore] finished: {} after {} iterations, coverage {:.1}%",
                    reason,
                    self.iteration,
                    self.coverage()
                );
                Some(ExploreStatus::Complete(reason))
            }
            Err(e) => {
                self.finished = true;
                log::error!("[Explore] {} ({})\n{}", e, e.code(), e.report());
                Some(ExploreStatus::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnveshakError;
    use crate::pathfinding::PathFailure;

    fn open_world(size: usize, start: Position) -> World {
        World::new(Grid::filled(size, CellState::Walkable), start, Direction::N).unwrap()
    }

    /// Replace the explorer's knowledge with `known` and a matching graph.
    fn inject(explorer: &mut Explorer, known: Grid) {
        let layout = *explorer.graph.layout();
        explorer.graph = Arc::new(ComponentGraph::from_known(&known, layout));
        explorer.known = Arc::new(known);
    }

    /// Open 16x16 map, known except the NE and SW corner cells.
    fn corners_unknown() -> Grid {
        let mut known = Grid::filled(16, CellState::Walkable);
        known.set(Position::new(0, 15), CellState::Unknown);
        known.set(Position::new(15, 0), CellState::Unknown);
        known
    }

    fn next_event(explorer: &mut Explorer) -> ProgressEvent {
        match explorer.next() {
            Some(ExploreStatus::InProgress(event)) => *event,
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_first_iteration_senses_and_moves() {
        let world = open_world(16, Position::new(8, 8));
        let mut explorer = Explorer::new(&world, ExplorationConfig::default()).unwrap();

        let event = next_event(&mut explorer);
        assert_eq!(event.iteration, 0);
        assert!(!event.sensor_hits.is_empty());
        assert!(event.coverage > 0.0);
        assert!(event.path.len() >= 2);
        assert_eq!(event.path[0], Position::new(8, 8));
        assert_eq!(event.pose, event.path[1]);
        assert_eq!(explorer.trail().len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let world = open_world(16, Position::new(8, 8));
        let config = ExplorationConfig::default().with_region_size(5);
        assert!(matches!(
            Explorer::new(&world, config),
            Err(ConfigError::RegionMismatch { .. })
        ));
    }

    #[test]
    fn test_max_iterations_terminates() {
        let world = open_world(32, Position::new(16, 16));
        let config = ExplorationConfig::default()
            .with_sensor_range(2)
            .with_max_iterations(3);
        let summary = Explorer::new(&world, config).unwrap().run().unwrap();
        assert_eq!(summary.reason, TerminationReason::MaxIterations);
        assert_eq!(summary.iterations, 3);
    }

    #[test]
    fn test_iterator_ends_after_completion() {
        let world = open_world(8, Position::new(4, 4));
        let config = ExplorationConfig::default()
            .with_sensor_range(8)
            .with_region_size(4);
        let mut explorer = Explorer::new(&world, config).unwrap();
        let mut completed = false;
        for status in explorer.by_ref() {
            if let ExploreStatus::Complete(_) = status {
                completed = true;
            }
        }
        assert!(completed);
        assert!(explorer.next().is_none());
    }

    #[test]
    fn test_unreachable_frontier_aborts_with_diagnostics() {
        env_logger::try_init().ok();

        let world = open_world(16, Position::new(2, 2));
        let config = ExplorationConfig::default().with_sensor_range(2);
        let mut explorer = Explorer::new(&world, config).unwrap();

        // Everything known except one corner cell, so the only frontier
        // lives in region (1,1); cut that node out of the graph.
        let mut known = Grid::filled(16, CellState::Walkable);
        known.set(Position::new(15, 15), CellState::Unknown);
        inject(&mut explorer, known);
        let far = explorer.graph.component_at(Position::new(14, 14)).unwrap();
        Arc::make_mut(&mut explorer.graph).detach(far);

        let err = match explorer.next() {
            Some(ExploreStatus::Failed(e)) => e,
            other => panic!("expected failure, got {:?}", other),
        };
        assert!(matches!(err, ExplorationError::UnreachableFrontier(_)));

        let report = err.report();
        assert_eq!(report.robot_component, explorer.graph.component_at(Position::new(2, 2)));
        assert_eq!(report.target_component, Some(far));
        assert_eq!(report.bfs_visited, 3);
        assert!(report.bfs_path.is_none());

        let text = report.to_string();
        assert!(text.contains("robot component:  R(0,0)#0"));
        assert!(text.contains("target component: R(1,1)#0"));
        assert!(text.contains("BFS visited: 3 nodes"));
        assert!(text.contains("known map around pose"));

        let top: AnveshakError = err.into();
        assert_ne!(top.exit_code(), 0);
        assert!(explorer.next().is_none());
    }

    #[test]
    fn test_switches_to_cheaper_revealed_target() {
        // Corridor along row 5 opening into a room east of column 15
        let size = 32;
        let mut truth = Grid::filled(size, CellState::Wall);
        for col in 1..=15 {
            truth.set(Position::new(5, col), CellState::Walkable);
        }
        for row in 0..size as i32 {
            for col in 16..size as i32 {
                truth.set(Position::new(row, col), CellState::Walkable);
            }
        }
        let world = World::new(truth, Position::new(5, 15), Direction::E).unwrap();
        let config = ExplorationConfig::default()
            .with_sensor_range(3)
            .with_target_switch_cooldown(0);
        let mut explorer = Explorer::new(&world, config).unwrap();

        // Only the west end of the corridor is known to lead anywhere
        let mut known = Grid::unknown(size);
        for col in 4..=15 {
            known.set(Position::new(5, col), CellState::Walkable);
        }
        for col in 3..=15 {
            known.set(Position::new(4, col), CellState::Wall);
            known.set(Position::new(6, col), CellState::Wall);
        }
        inject(&mut explorer, known);
        let far = Position::new(5, 4);
        explorer.target = Some(far);

        // The room is one step too close to surface at first; the switch
        // comes as soon as it does
        let event = (0..3)
            .map(|_| next_event(&mut explorer))
            .find(|e| e.switched)
            .expect("no switch within three iterations");
        assert_ne!(event.target, Some(far));
        assert!(event.target.is_some_and(|t| t.col > 15));
        assert_eq!(explorer.history().last(), Some(far));
        assert!(explorer.history().is_recent(far));

        let event = next_event(&mut explorer);
        assert_ne!(event.target, Some(far));
    }

    #[test]
    fn test_target_kept_without_cheaper_alternative() {
        // A dead-straight corridor only ever has one frontier
        let mut truth = Grid::filled(32, CellState::Wall);
        for col in 1..31 {
            truth.set(Position::new(5, col), CellState::Walkable);
        }
        let world = World::new(truth, Position::new(5, 1), Direction::E).unwrap();
        let config = ExplorationConfig::default().with_sensor_range(3);
        let mut explorer = Explorer::new(&world, config).unwrap();

        while let Some(status) = explorer.next() {
            if let ExploreStatus::InProgress(event) = status {
                assert!(!event.switched, "switched at iteration {}", event.iteration);
            }
        }
        assert_eq!(explorer.switches, 0);
        assert_eq!(explorer.coverage(), 100.0);
    }

    #[test]
    fn test_arrival_retires_target() {
        let world = open_world(16, Position::new(8, 8));
        let config = ExplorationConfig::default().with_sensor_range(1);
        let mut explorer = Explorer::new(&world, config).unwrap();

        let event = (0..20)
            .map(|_| next_event(&mut explorer))
            .find(|e| e.target.is_none())
            .expect("no target reached in 20 iterations");
        let reached = event.pose;
        assert_eq!(explorer.history().last(), Some(reached));
        assert!(!explorer.known().is_frontier(reached));
    }

    #[test]
    fn test_missing_transition_on_any_candidate_is_fatal() {
        let world = open_world(16, Position::new(2, 5));
        let mut explorer = Explorer::new(&world, ExplorationConfig::default()).unwrap();
        inject(&mut explorer, corners_unknown());

        // R(0,0) and R(0,1) stay neighbours but lose every transition, so
        // the NE frontier passes the reachability check and cannot be planned
        let west = explorer.graph.component_at(Position::new(0, 0)).unwrap();
        let east = explorer.graph.component_at(Position::new(0, 14)).unwrap();
        Arc::make_mut(&mut explorer.graph).cut_transitions(west, east);
        assert!(explorer.graph.is_reachable(west, east));

        let err = match explorer.next() {
            Some(ExploreStatus::Failed(e)) => e,
            other => panic!("expected failure, got {:?}", other),
        };
        let ExplorationError::PlanningMiss { failure, report } = &err else {
            panic!("expected planning miss, got {}", err);
        };
        assert_eq!(
            *failure,
            PathFailure::MissingTransition {
                from: west,
                to: east
            }
        );
        assert_eq!(report.robot_component, Some(west));
        assert_eq!(err.code(), "PLANNING_MISS");
        assert!(explorer.next().is_none());
    }

    #[test]
    fn test_selection_skips_recent_targets_then_relaxes() {
        let world = open_world(16, Position::new(2, 5));
        let mut explorer = Explorer::new(&world, ExplorationConfig::default()).unwrap();
        inject(&mut explorer, corners_unknown());
        let frontiers = explorer.detect().frontiers;
        assert_eq!(frontiers.len(), 2);

        let (best, _) = explorer.select_target(&frontiers).unwrap().unwrap();
        explorer.history.push(best.target);
        let (other, _) = explorer.select_target(&frontiers).unwrap().unwrap();
        assert_ne!(other.target, best.target);

        // Every frontier recent: the cheapest one comes back
        explorer.history.push(other.target);
        let (relaxed, _) = explorer.select_target(&frontiers).unwrap().unwrap();
        assert_eq!(relaxed.target, best.target);
    }

    #[test]
    fn test_stop_waits_for_current_leg() {
        let world = open_world(16, Position::new(2, 5));
        let config = ExplorationConfig::default().with_exploration_threshold(50.0);
        let mut explorer = Explorer::new(&world, config).unwrap();
        inject(&mut explorer, corners_unknown());
        let goal = Position::new(12, 3);
        explorer.target = Some(goal);

        // Coverage is already past the threshold, yet the robot walks on
        let mut last = None;
        for status in explorer.by_ref() {
            match status {
                ExploreStatus::InProgress(event) => {
                    assert!(event.frontiers.is_empty());
                    last = Some(*event);
                }
                ExploreStatus::Complete(reason) => {
                    assert_eq!(reason, TerminationReason::CoverageReached)
                }
                ExploreStatus::Failed(e) => panic!("{}", e),
            }
        }
        let last = last.expect("no leg walked");
        assert_eq!(last.pose, goal);
        assert_eq!(last.target, None);

        let summary = explorer.summary(TerminationReason::CoverageReached);
        assert_eq!(summary.pose, goal);
        assert_eq!(summary.last_target, Some(goal));
    }

    #[test]
    fn test_delay_applied_by_explorer() {
        let world = open_world(32, Position::new(16, 16));
        let config = ExplorationConfig::default()
            .with_sensor_range(2)
            .with_step_delay_ms(30);
        let mut explorer = Explorer::new(&world, config).unwrap();

        let first = next_event(&mut explorer);
        assert_eq!(first.delay, Duration::from_millis(30));

        let started = std::time::Instant::now();
        next_event(&mut explorer);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
