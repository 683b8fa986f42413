use ahatool_cli::{main_for, BlockKind};

fn main() {
    main_for(BlockKind::Container)
}
