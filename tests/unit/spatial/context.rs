//! Tests for predecessor-chain enumeration and context vector equality

#[cfg(test)]
mod tests {
    use markovtex::spatial::context::{ChainMode, ContextVector, enumerate_contexts};
    use markovtex::spatial::graph::{Digraph, VertexId};

    // Encodes the position into the color so chains can be read back
    fn position_color(graph: &Digraph, vertex: VertexId) -> Option<[f64; 3]> {
        graph
            .position(vertex)
            .map(|[x, y]| [x as f64, y as f64, 0.0])
    }

    fn vertex_at(graph: &Digraph, x: usize, y: usize) -> VertexId {
        graph
            .vertices()
            .find(|&v| graph.position(v) == Some([x, y]))
            .unwrap()
    }

    fn sorted(contexts: Vec<ContextVector>) -> Vec<Vec<f64>> {
        let mut raw: Vec<Vec<f64>> = contexts.into_iter().map(ContextVector::into_inner).collect();
        raw.sort_by(|a, b| a.partial_cmp(b).unwrap());
        raw
    }

    // Tests the top-left corner only has the empty context
    #[test]
    fn test_corner_has_only_empty_context() {
        let graph = Digraph::grid(3, 3).unwrap();
        let origin = vertex_at(&graph, 0, 0);

        for mode in [ChainMode::AllPrefixes, ChainMode::LongestOnly] {
            let contexts = enumerate_contexts(&graph, origin, 2, mode, |v| position_color(&graph, v));
            assert_eq!(contexts, vec![ContextVector::default()]);
        }
    }

    // Tests every prefix of every chain is produced while fitting
    #[test]
    fn test_all_prefixes_interior() {
        let graph = Digraph::grid(3, 3).unwrap();
        let origin = vertex_at(&graph, 1, 1);

        let contexts = enumerate_contexts(&graph, origin, 2, ChainMode::AllPrefixes, |v| {
            position_color(&graph, v)
        });

        let expected = sorted(vec![
            ContextVector::new(vec![]),
            ContextVector::new(vec![0.0, 1.0, 0.0]),
            ContextVector::new(vec![1.0, 0.0, 0.0]),
            ContextVector::new(vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
            ContextVector::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ]);
        assert_eq!(sorted(contexts), expected);
    }

    // Tests only maximal chains are produced during generation
    #[test]
    fn test_longest_only_interior() {
        let graph = Digraph::grid(3, 3).unwrap();
        let origin = vertex_at(&graph, 2, 2);

        let contexts = enumerate_contexts(&graph, origin, 2, ChainMode::LongestOnly, |v| {
            position_color(&graph, v)
        });

        assert_eq!(contexts.len(), 4);
        assert!(contexts.iter().all(|context| context.arity() == 2));
    }

    // Tests chains near the boundary are truncated, not padded
    #[test]
    fn test_boundary_truncation() {
        let graph = Digraph::grid(3, 3).unwrap();
        let origin = vertex_at(&graph, 1, 0);

        let contexts = enumerate_contexts(&graph, origin, 3, ChainMode::LongestOnly, |v| {
            position_color(&graph, v)
        });

        assert_eq!(sorted(contexts), vec![vec![0.0, 0.0, 0.0]]);
    }

    // Tests an unavailable predecessor ends its chain instead of contributing
    #[test]
    fn test_unavailable_predecessor_ends_chain() {
        let graph = Digraph::grid(2, 2).unwrap();
        let origin = vertex_at(&graph, 1, 1);
        let blocked = vertex_at(&graph, 1, 0);

        let contexts = enumerate_contexts(&graph, origin, 2, ChainMode::LongestOnly, |v| {
            if v == blocked {
                None
            } else {
                position_color(&graph, v)
            }
        });

        assert_eq!(
            sorted(contexts),
            vec![vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0]]
        );
    }

    // Tests context equality compares exact bit patterns and lengths
    #[test]
    fn test_context_equality_and_prefix() {
        let context = ContextVector::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(context.arity(), 2);
        assert_eq!(context.prefix(1), ContextVector::new(vec![1.0, 2.0, 3.0]));
        assert_eq!(context.prefix(5), context);
        assert_ne!(context.prefix(1), context);
        assert_ne!(
            ContextVector::new(vec![0.0, 0.0, 0.0]),
            ContextVector::new(vec![0.0, 0.0, f64::EPSILON])
        );
        assert_eq!(context.prefix(0).as_slice(), &[] as &[f64]);
    }
}
