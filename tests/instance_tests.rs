//! Unit tests for instance construction and the text loader.

use hub_vns::error::HubError;
use hub_vns::instance::Instance;

const THREE_NODES: &str = "3
0.5

10
10
10
0 1 2
1 0 1

2 1 0
0 0 5
0 0 0
5 0 0
";

#[test]
fn test_parse_instance_with_blank_lines() {
    let instance: Instance = THREE_NODES.parse().unwrap();

    assert_eq!(instance.size(), 3);
    assert_eq!(instance.scale_factor(), 0.5);
    assert_eq!(instance.installation_costs(), &[10.0, 10.0, 10.0]);
    assert_eq!(instance.distance(0, 2), 2.0);
    assert_eq!(instance.distance(2, 1), 1.0);
    assert_eq!(instance.flow(0, 2), 5.0);
    assert_eq!(instance.flow(2, 0), 5.0);
    assert_eq!(instance.flow(1, 0), 0.0);
}

#[test]
fn test_flow_totals() {
    let instance: Instance = THREE_NODES.parse().unwrap();

    assert_eq!(instance.outgoing_flow(0), 5.0);
    assert_eq!(instance.incoming_flow(0), 5.0);
    assert_eq!(instance.outgoing_flow(1), 0.0);
    assert_eq!(instance.incoming_flow(2), 5.0);
}

#[test]
fn test_parse_error_reports_line() {
    let text = "3\n0.5\n10\n10\nabc\n";

    match text.parse::<Instance>() {
        Err(HubError::Parse { line, token }) => {
            assert_eq!(line, 5);
            assert_eq!(token, "abc");
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_truncated_file() {
    let text = "3\n0.5\n10\n10\n10\n0 1 2\n1 0 1\n";

    assert!(matches!(
        text.parse::<Instance>(),
        Err(HubError::UnexpectedEof)
    ));
}

#[test]
fn test_short_matrix_row() {
    let text = "2\n0.5\n1\n1\n0 1\n1\n0 0\n0 0\n";

    match text.parse::<Instance>() {
        Err(HubError::DimensionMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected a dimension mismatch, got {:?}", other),
    }
}

#[test]
fn test_zero_size_rejected() {
    assert!(matches!(
        "0\n0.5\n".parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
    assert!(matches!(
        Instance::new(0, 0.5, vec![], vec![], vec![]),
        Err(HubError::InvalidInstance(_))
    ));
}

#[test]
fn test_fractional_size_rejected() {
    assert!(matches!(
        "2.5\n0.5\n".parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
}

#[test]
fn test_new_checks_dimensions() {
    let result = Instance::new(
        2,
        0.5,
        vec![1.0, 1.0, 1.0],
        vec![vec![0.0; 2]; 2],
        vec![vec![0.0; 2]; 2],
    );
    assert!(matches!(result, Err(HubError::DimensionMismatch { .. })));

    let result = Instance::new(
        2,
        0.5,
        vec![1.0, 1.0],
        vec![vec![0.0; 2]; 2],
        vec![vec![0.0; 3], vec![0.0; 2]],
    );
    assert!(matches!(result, Err(HubError::DimensionMismatch { .. })));
}

#[test]
fn test_negative_scale_factor_rejected() {
    let result = Instance::new(1, -1.0, vec![1.0], vec![vec![0.0]], vec![vec![0.0]]);
    assert!(matches!(result, Err(HubError::InvalidInstance(_))));
}

#[test]
fn test_huge_size_rejected_before_allocating() {
    assert!(matches!(
        "1e19\n0.5\n1\n".parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
    assert!(matches!(
        "inf\n0.5\n1\n".parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
}

#[test]
fn test_nan_installation_cost_rejected() {
    let text = "2\n0.5\nNaN\n1\n0 1\n1 0\n0 1\n1 0\n";

    assert!(matches!(
        text.parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
}

#[test]
fn test_negative_distance_rejected() {
    let text = "2\n0.5\n1\n1\n0 -3\n-3 0\n0 1\n1 0\n";

    assert!(matches!(
        text.parse::<Instance>(),
        Err(HubError::InvalidInstance(_))
    ));
}

#[test]
fn test_non_finite_values_rejected_by_new() {
    let result = Instance::new(
        1,
        f64::INFINITY,
        vec![1.0],
        vec![vec![0.0]],
        vec![vec![0.0]],
    );
    assert!(matches!(result, Err(HubError::InvalidInstance(_))));

    let result = Instance::new(
        2,
        0.5,
        vec![1.0, 1.0],
        vec![vec![0.0; 2]; 2],
        vec![vec![0.0, f64::NAN], vec![-1.0, 0.0]],
    );
    assert!(matches!(result, Err(HubError::InvalidInstance(_))));
}

#[test]
fn test_from_file_uses_file_stem_as_name() {
    let path = std::env::temp_dir().join(format!("hub_vns_three_{}.txt", std::process::id()));
    std::fs::write(&path, THREE_NODES).unwrap();

    let instance = Instance::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(instance.size(), 3);
    assert_eq!(
        instance.name(),
        format!("hub_vns_three_{}", std::process::id())
    );
}

#[test]
fn test_missing_file() {
    let result = Instance::from_file("/nonexistent/hub_vns/instance.txt");
    assert!(matches!(result, Err(HubError::Io(_))));
}
