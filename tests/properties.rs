use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use teaching_load::algo::bellman_ford::shortest_path;
use teaching_load::algo::residual::ResidualGraph;
use teaching_load::{
    AllocationConfig, FlowOutcome, MinCostFlow, Network, Roster, Subject, SuccessiveShortestPaths,
    Teacher, Termination,
};

fn random_roster(seed: u64, teachers: usize, subjects: usize) -> Roster {
    let mut rng = StdRng::seed_from_u64(seed);
    let subjects: Vec<Subject> = (0..subjects)
        .map(|idx| Subject {
            code: format!("S{idx}"),
            name: format!("Subject {idx}"),
            classes: rng.gen_range(0..5),
        })
        .collect();
    let teachers = (0..teachers)
        .map(|idx| {
            let mut preferences: Vec<String> = Vec::new();
            for _ in 0..rng.gen_range(0..5) {
                let code = format!("S{}", rng.gen_range(0..subjects.len()));
                if !preferences.contains(&code) {
                    preferences.push(code);
                }
            }
            Teacher {
                name: format!("T{idx}"),
                offered_classes: rng.gen_range(0..6),
                preferences,
            }
        })
        .collect();
    Roster::new(teachers, subjects)
}

/// Dense random network over `n` vertices, source `0` and sink `n - 1`, where both directions of
/// a pair are drawn independently.
fn random_network(seed: u64, n: usize) -> Network<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = Network::new(n, 0, n - 1).unwrap();
    for u in 0..n {
        for v in 0..n {
            if u != v && rng.gen_bool(0.35) {
                network
                    .add_edge(u, v, rng.gen_range(1..=4), rng.gen_range(0..=20))
                    .unwrap();
            }
        }
    }
    network.set_supply(0, rng.gen_range(1..=10)).unwrap();
    network
}

fn solve(network: &Network<i64>) -> FlowOutcome<i64> {
    SuccessiveShortestPaths::new().min_cost_flow(network).unwrap()
}

/// Residual network of `flow`, with an extra root reaching every vertex so that any negative
/// cycle is reachable from it. Remaining capacity and cancellable flow of an input edge stay
/// separate entries, also when the opposite input edge exists.
fn residual_of(
    network: &Network<i64>,
    outcome: &FlowOutcome<i64>,
) -> (Network<i64>, ResidualGraph<i64>) {
    let n = network.num_vertices();
    let mut check = Network::new(n + 1, n, network.sink()).unwrap();
    let mut residual = ResidualGraph::new(n);
    for v in 0..n {
        check.add_edge(n, v, 1, 0).unwrap();
    }
    for e in network.edges() {
        let f = outcome.flow.get(e.tail, e.head);
        if e.capacity - f > 0 {
            check
                .add_edge(e.tail, e.head, e.capacity - f, e.unit_cost)
                .unwrap();
            residual
                .add_edge(e.tail, e.head, e.capacity - f, e.unit_cost)
                .unwrap();
        }
        if f > 0 {
            check.add_edge(e.head, e.tail, f, -e.unit_cost).unwrap();
            residual
                .add_reverse_edge(e.head, e.tail, f, -e.unit_cost)
                .unwrap();
        }
    }
    residual.flatten();
    (check, residual)
}

fn assert_flow_properties(network: &Network<i64>, outcome: &FlowOutcome<i64>) {
    let (s, t) = (network.source(), network.sink());

    // conservation
    for v in 0..network.num_vertices() {
        if v != s && v != t {
            assert_eq!(outcome.flow.inflow(v), outcome.flow.outflow(v), "vertex {v}");
        }
    }

    // capacity respect, flow only on declared edges
    for (u, v, f) in outcome.flow.nonzero() {
        let capacity = network.capacity(u, v).expect("flow on a missing edge");
        assert!(f > 0 && f <= capacity, "edge {u} -> {v} carries {f} of {capacity}");
    }

    // supply bound
    let sent = outcome.flow.outflow(s) - outcome.flow.inflow(s);
    assert_eq!(sent, outcome.delivered);
    assert!(sent <= network.supply(s));
    assert_eq!(outcome.delivered + outcome.remaining_supply, network.supply(s));

    // monotone per-unit path costs
    for pair in outcome.augmentations.windows(2) {
        assert!(pair[0].unit_cost <= pair[1].unit_cost);
    }

    let (check, residual) = residual_of(network, outcome);
    // maximal: nothing more reaches the sink when supply is left
    if outcome.termination == Termination::NoAugmentingPath {
        assert!(outcome.remaining_supply > 0);
        assert_eq!(shortest_path(&residual, s, t), Ok(None));
    }
    // minimal cost for the delivered amount: no negative residual cycle
    assert_eq!(check.validate(), Ok(()));

    // determinism
    assert_eq!(&solve(network), outcome);
}

#[rstest]
#[case(1, 3, 4)]
#[case(7, 5, 5)]
#[case(42, 8, 6)]
#[case(1234, 10, 3)]
#[case(99, 2, 9)]
#[case(2024, 12, 12)]
fn allocation_properties_hold(
    #[case] seed: u64,
    #[case] teachers: usize,
    #[case] subjects: usize,
) {
    let roster = random_roster(seed, teachers, subjects);
    let (_, network) = roster.network(&AllocationConfig::default()).unwrap();
    assert_flow_properties(&network, &solve(&network));
}

#[rstest]
#[case(3, 4)]
#[case(11, 5)]
#[case(17, 6)]
#[case(23, 7)]
#[case(31, 8)]
#[case(57, 10)]
fn general_network_properties_hold(#[case] seed: u64, #[case] n: usize) {
    let network = random_network(seed, n);
    assert_flow_properties(&network, &solve(&network));
}

#[test]
fn delivered_is_min_of_supply_and_capacity() {
    let mut network = Network::new(4, 0, 3).unwrap();
    network.add_edge(0, 1, 5, 1).unwrap();
    network.add_edge(0, 2, 5, 2).unwrap();
    network.add_edge(1, 3, 2, 0).unwrap();
    network.add_edge(2, 3, 2, 0).unwrap();

    for (supply, expected) in [(1, 1), (3, 3), (4, 4), (9, 4)] {
        network.set_supply(0, supply).unwrap();
        let outcome = solve(&network);
        assert_eq!(outcome.delivered, expected, "supply {supply}");
        assert_eq!(outcome.remaining_supply, supply - expected);
    }
}
