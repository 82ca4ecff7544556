use super::DenseGraph;
use mazerunner_common::types::VertexId;

/// Strongly connected components, each labelled by its smallest vertex id.
///
/// Iterative Tarjan so deep graphs do not exhaust the stack.
pub fn strongly_connected_components(graph: &DenseGraph) -> Vec<(VertexId, VertexId)> {
    const UNVISITED: usize = usize::MAX;

    let n = graph.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut labels: Vec<VertexId> = vec![0; n];
    let mut next_index = 0usize;

    // (vertex, position in its neighbor list)
    let mut call_stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        call_stack.push((root, 0));
        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.0;
            let neighbors = graph.neighbors(v);
            if frame.1 < neighbors.len() {
                let w = neighbors[frame.1];
                frame.1 += 1;
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call_stack.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if lowlink[v] == index[v] {
                let mut members = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    members.push(w);
                    if w == v {
                        break;
                    }
                }
                let label = members
                    .iter()
                    .map(|&m| graph.id(m))
                    .min()
                    .unwrap_or_else(|| graph.id(v));
                for m in members {
                    labels[m] = label;
                }
            }
        }
    }

    (0..n).map(|i| (graph.id(i), labels[i])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerunner_common::types::Edge;

    #[test]
    fn cycle_and_tail_split_into_components() {
        // 3 -> 4 -> 5 -> 3 is a cycle, 5 -> 8 -> 9 is a tail
        let edges = vec![
            Edge::new(3u64, 4u64, ()),
            Edge::new(4, 5, ()),
            Edge::new(5, 3, ()),
            Edge::new(5, 8, ()),
            Edge::new(8, 9, ()),
        ];
        let labels = strongly_connected_components(&DenseGraph::directed(&edges));
        assert_eq!(labels, vec![(3, 3), (4, 3), (5, 3), (8, 8), (9, 9)]);
    }
}
