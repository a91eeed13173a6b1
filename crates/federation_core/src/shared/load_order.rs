use indexmap::{IndexMap, IndexSet};
use tracing::instrument;

use crate::BuildSession;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOrder {
    /// Shared names, every module after the shared modules it depends on.
    pub order: Vec<String>,
    /// Dependency cycles found while ordering, each listed from its entry point.
    pub cycles: Vec<Vec<String>>,
}

/// Orders shared modules so dependencies load first.
///
/// Modules without shared dependencies keep declaration order and come
/// first. The rest are visited depth first, fewest dependencies first. A
/// cycle does not fail the build: it is reported and its members are placed
/// in visiting order.
#[instrument(skip_all)]
pub fn compute_load_priority(session: &mut BuildSession) -> LoadOrder {
    let mut order: IndexSet<String> = IndexSet::new();
    let mut cycles = vec![];

    for module in session.shared.values() {
        if module.dependency_set.is_empty() {
            order.insert(module.name.clone());
        }
    }

    let mut pending = session
        .shared
        .values()
        .filter(|module| !module.dependency_set.is_empty())
        .collect::<Vec<_>>();
    pending.sort_by_key(|module| module.dependency_set.len());

    for module in pending {
        let mut stack = vec![];
        visit(session, &module.name, &mut order, &mut stack, &mut cycles);
    }

    for cycle in &cycles {
        tracing::warn!("circular dependency between shared modules: {}", cycle.join(" -> "));
    }

    let mut reordered = order
        .iter()
        .filter_map(|name| session.shared.shift_remove_entry(name))
        .collect::<IndexMap<_, _>>();
    // Anything the walk did not reach keeps its relative position at the end.
    reordered.extend(session.shared.drain(..));
    session.shared = reordered;

    let order = session.shared.keys().cloned().collect::<Vec<_>>();
    tracing::debug!("shared load order {:?}", order);
    session.load_order = order.clone();
    session.cycles = cycles.clone();
    LoadOrder { order, cycles }
}

fn visit(
    session: &BuildSession,
    name: &str,
    order: &mut IndexSet<String>,
    stack: &mut Vec<String>,
    cycles: &mut Vec<Vec<String>>,
) {
    if order.contains(name) {
        return;
    }
    if let Some(index) = stack.iter().position(|visiting| visiting == name) {
        let mut cycle = stack[index..].to_vec();
        cycle.push(name.to_string());
        cycles.push(cycle);
        return;
    }
    let Some(module) = session.shared.get(name) else {
        return;
    };
    stack.push(name.to_string());
    let mut deps = module.dependency_set.iter().collect::<Vec<_>>();
    deps.sort_by_key(|dep| session.shared.get_index_of(dep.as_str()));
    for dep in deps {
        visit(session, dep, order, stack, cycles);
    }
    stack.pop();
    order.insert(name.to_string());
}
