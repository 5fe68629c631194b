//! Order computations for drag-and-drop and keyboard moves.
//!
//! Functions here take the current visible sequence and return a new one
//! with dense order stamps. They never touch the store; the store applies
//! the result.

use std::collections::HashSet;

use crate::models::{Block, BlockId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
}

/// Re-stamp every block's order to its position
pub fn renumber(blocks: &mut [Block]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.order = index;
    }
}

/// Sort by existing order stamps, then make them dense
pub fn normalize(blocks: &mut [Block]) {
    blocks.sort_by_key(|block| block.order);
    renumber(blocks);
}

/// Move the block at `source_index` so it lands at `destination_index`
///
/// The destination is measured in the list after removal, as drag lists
/// report it. Indices are expected to come from a drag gesture and be in
/// range.
pub fn reorder(blocks: &[Block], source_index: usize, destination_index: usize) -> Vec<Block> {
    let mut result = blocks.to_vec();
    let moved = result.remove(source_index);
    result.insert(destination_index, moved);
    renumber(&mut result);
    result
}

/// Move every block in `ids` one step in `direction`
///
/// All-or-nothing: if any selected block already sits at the edge in
/// that direction, the input comes back unchanged (`None`).
pub fn move_selected(
    blocks: &[Block],
    ids: &[BlockId],
    direction: Direction,
) -> Option<Vec<Block>> {
    let wanted: HashSet<BlockId> = ids.iter().copied().collect();
    let mut indices: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| wanted.contains(&block.id))
        .map(|(index, _)| index)
        .collect();

    if indices.is_empty() {
        return None;
    }

    let last = blocks.len() - 1;
    let at_edge = match direction {
        Direction::Up => indices.contains(&0),
        Direction::Down => indices.contains(&last),
    };
    if at_edge {
        return None;
    }

    // Up walks ascending and Down descending, so a run of adjacent
    // selected blocks shifts together.
    if direction == Direction::Down {
        indices.reverse();
    }

    let mut result = blocks.to_vec();
    for index in indices {
        match direction {
            Direction::Up => result.swap(index, index - 1),
            Direction::Down => result.swap(index, index + 1),
        }
    }
    renumber(&mut result);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn blocks(names: &[&str]) -> Vec<Block> {
        names
            .iter()
            .enumerate()
            .map(|(order, name)| Block {
                id: BlockId::new(),
                kind: BlockKind::Text,
                content: name.to_string(),
                order,
                language: None,
            })
            .collect()
    }

    fn contents(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.content.as_str()).collect()
    }

    fn ids_of(blocks: &[Block], names: &[&str]) -> Vec<BlockId> {
        blocks
            .iter()
            .filter(|b| names.contains(&b.content.as_str()))
            .map(|b| b.id)
            .collect()
    }

    #[rstest]
    #[case(0, 2, &["b", "c", "a", "d"])]
    #[case(3, 0, &["d", "a", "b", "c"])]
    #[case(1, 1, &["a", "b", "c", "d"])]
    #[case(2, 3, &["a", "b", "d", "c"])]
    fn test_reorder_moves_block(
        #[case] source: usize,
        #[case] destination: usize,
        #[case] expected: &[&str],
    ) {
        let original = blocks(&["a", "b", "c", "d"]);
        let result = reorder(&original, source, destination);

        assert_eq!(contents(&result), expected);
        let orders: Vec<usize> = result.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[rstest]
    #[case(0, 3)]
    #[case(3, 0)]
    #[case(1, 2)]
    #[case(2, 2)]
    fn test_reorder_round_trip_restores_sequence(#[case] i: usize, #[case] j: usize) {
        let original = blocks(&["a", "b", "c", "d"]);
        let restored = reorder(&reorder(&original, i, j), j, i);
        assert_eq!(contents(&restored), contents(&original));
    }

    #[test]
    fn test_move_adjacent_selection_up_together() {
        let original = blocks(&["a", "b", "c", "d"]);
        let ids = ids_of(&original, &["b", "c"]);

        let result = move_selected(&original, &ids, Direction::Up).unwrap();

        assert_eq!(contents(&result), vec!["b", "c", "a", "d"]);
        assert_eq!(result[3].order, 3);
    }

    #[test]
    fn test_move_adjacent_selection_down_together() {
        let original = blocks(&["a", "b", "c", "d"]);
        let ids = ids_of(&original, &["b", "c"]);

        let result = move_selected(&original, &ids, Direction::Down).unwrap();

        assert_eq!(contents(&result), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_move_scattered_selection() {
        let original = blocks(&["a", "b", "c", "d", "e"]);
        let ids = ids_of(&original, &["b", "d"]);

        let result = move_selected(&original, &ids, Direction::Up).unwrap();

        assert_eq!(contents(&result), vec!["b", "a", "d", "c", "e"]);
    }

    #[rstest]
    #[case(&["a", "c"], Direction::Up)]
    #[case(&["b", "d"], Direction::Down)]
    fn test_move_at_boundary_is_all_or_nothing(
        #[case] names: &[&str],
        #[case] direction: Direction,
    ) {
        let original = blocks(&["a", "b", "c", "d"]);
        let ids = ids_of(&original, names);

        assert!(move_selected(&original, &ids, direction).is_none());
    }

    #[test]
    fn test_move_with_unknown_ids_is_noop() {
        let original = blocks(&["a", "b"]);
        assert!(move_selected(&original, &[BlockId::new()], Direction::Down).is_none());
    }

    #[test]
    fn test_normalize_sorts_and_densifies() {
        let mut list = blocks(&["a", "b", "c"]);
        list[0].order = 40;
        list[1].order = 7;
        list[2].order = 12;

        normalize(&mut list);

        assert_eq!(contents(&list), vec!["b", "c", "a"]);
        let orders: Vec<usize> = list.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
