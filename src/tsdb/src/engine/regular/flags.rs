use tracing::warn;

use crate::engine::regular::block::Block;
use crate::engine::regular::position::Position;

/// FlagSupport is the lifecycle of the parallel data-flag storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagSupport {
    /// No caller has ever supplied a non-empty flag.
    Unallocated,
    /// Flag blocks are allocated congruent with the value blocks.
    Enabled,
    /// A flag allocation failed once; flags are best effort and stay off
    /// for the remaining life of the store.
    Disabled,
}

/// FlagBlock mirrors the shape of one value block, holding one short text
/// flag per cell. The default flag is the empty string.
#[derive(Clone, Debug, PartialEq)]
pub enum FlagBlock {
    Flat(Vec<String>),
    Daily(Vec<Vec<String>>),
}

impl FlagBlock {
    fn get(&self, day: usize, offset: usize) -> &str {
        match self {
            FlagBlock::Flat(flags) => &flags[offset],
            FlagBlock::Daily(days) => &days[day][offset],
        }
    }

    fn set(&mut self, day: usize, offset: usize, flag: &str) {
        match self {
            FlagBlock::Flat(flags) => flags[offset] = flag.to_string(),
            FlagBlock::Daily(days) => days[day][offset] = flag.to_string(),
        }
    }
}

/// DataFlagStore holds the optional text flags parallel to the value
/// blocks. Allocation is lazy (triggered by the first non-empty flag) and
/// best effort: a failed allocation degrades support to Disabled instead of
/// propagating an error to per-value writes.
#[derive(Clone, Debug)]
pub struct DataFlagStore {
    support: FlagSupport,
    blocks: Vec<FlagBlock>,
}

impl Default for DataFlagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFlagStore {
    pub fn new() -> Self {
        Self {
            support: FlagSupport::Unallocated,
            blocks: Vec::new(),
        }
    }

    pub fn support(&self) -> FlagSupport {
        self.support
    }

    pub fn enabled(&self) -> bool {
        self.support == FlagSupport::Enabled
    }

    /// allocate builds empty-string flag blocks congruent block-for-block
    /// with the value blocks. A reserve failure is caught here, logged, and
    /// recorded as Disabled; the returned state tells the caller which way
    /// it went. Calling allocate on an Enabled or Disabled store is a
    /// no-op.
    pub fn allocate(&mut self, shape: &[Block]) -> FlagSupport {
        if self.support != FlagSupport::Unallocated {
            return self.support;
        }

        match try_build(shape) {
            Ok(blocks) => {
                self.blocks = blocks;
                self.support = FlagSupport::Enabled;
            }
            Err(e) => {
                warn!("flag allocation failed, flags disabled for this store: {}", e);
                self.support = FlagSupport::Disabled;
            }
        }
        self.support
    }

    /// get returns the flag at pos, or the empty string while flags are not
    /// enabled.
    pub fn get(&self, pos: Position) -> &str {
        if !self.enabled() {
            return "";
        }
        self.blocks[pos.block].get(pos.day, pos.offset)
    }

    /// set writes the flag at pos. Ignored while flags are not enabled.
    pub fn set(&mut self, pos: Position, flag: &str) {
        if !self.enabled() {
            return;
        }
        self.blocks[pos.block].set(pos.day, pos.offset, flag);
    }
}

fn try_build(shape: &[Block]) -> anyhow::Result<Vec<FlagBlock>> {
    let mut blocks = Vec::new();
    blocks
        .try_reserve_exact(shape.len())
        .map_err(|e| anyhow!("flag block index reserve failed: {}", e))?;

    for block in shape {
        let mirrored = match block {
            Block::Flat(values) => FlagBlock::Flat(try_strings(values.len())?),
            Block::Daily(days) => {
                let mut flag_days = Vec::new();
                flag_days
                    .try_reserve_exact(days.len())
                    .map_err(|e| anyhow!("flag day index reserve failed: {}", e))?;
                for day in days {
                    flag_days.push(try_strings(day.len())?);
                }
                FlagBlock::Daily(flag_days)
            }
        };
        blocks.push(mirrored);
    }
    Ok(blocks)
}

fn try_strings(len: usize) -> anyhow::Result<Vec<String>> {
    let mut flags: Vec<String> = Vec::new();
    flags
        .try_reserve_exact(len)
        .map_err(|e| anyhow!("flag block reserve failed: {}", e))?;
    flags.resize(len, String::new());
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use crate::engine::regular::block::build;
    use crate::engine::regular::flags::{DataFlagStore, FlagBlock, FlagSupport};
    use crate::engine::regular::position::Position;
    use hydrots_base::interval::Interval;

    #[test]
    fn test_lazy_allocation_mirrors_shape() {
        let blocks = vec![
            build(Interval::minutes(15), 2004, 1, -999.0).unwrap(),
            build(Interval::minutes(15), 2004, 2, -999.0).unwrap(),
        ];

        let mut flags = DataFlagStore::new();
        assert_eq!(flags.support(), FlagSupport::Unallocated);
        assert_eq!(flags.get(Position::flat(0, 0)), "");

        assert_eq!(flags.allocate(&blocks), FlagSupport::Enabled);
        match &flags.blocks[1] {
            FlagBlock::Daily(days) => {
                assert_eq!(days.len(), 29, "congruent with the leap February");
                assert_eq!(days[0].len(), 96);
            }
            FlagBlock::Flat(_) => panic!("minute flag block should be daily"),
        }
    }

    #[test]
    fn test_default_is_empty_string() {
        let blocks = vec![build(Interval::daily(), 2000, 6, -999.0).unwrap()];
        let mut flags = DataFlagStore::new();
        flags.allocate(&blocks);

        assert_eq!(flags.get(Position::flat(0, 15)), "");
        flags.set(Position::flat(0, 15), "A");
        assert_eq!(flags.get(Position::flat(0, 15)), "A");
        assert_eq!(flags.get(Position::flat(0, 14)), "", "neighbors untouched");
    }

    #[test]
    fn test_allocate_twice_is_noop() {
        let blocks = vec![build(Interval::daily(), 2000, 6, -999.0).unwrap()];
        let mut flags = DataFlagStore::new();
        flags.allocate(&blocks);
        flags.set(Position::flat(0, 3), "E");

        assert_eq!(flags.allocate(&blocks), FlagSupport::Enabled);
        assert_eq!(flags.get(Position::flat(0, 3)), "E", "reallocation must not wipe flags");
    }

    #[test]
    fn test_disabled_ignores_writes() {
        let mut flags = DataFlagStore::new();
        flags.support = FlagSupport::Disabled;
        flags.set(Position::flat(0, 0), "A");
        assert_eq!(flags.get(Position::flat(0, 0)), "");
        assert_eq!(
            flags.allocate(&[]),
            FlagSupport::Disabled,
            "disabled stays disabled"
        );
    }
}
