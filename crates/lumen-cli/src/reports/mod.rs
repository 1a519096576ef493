mod tables;

pub use self::tables::{
    catalog as print_catalog, placements as print_placements, summary as print_summary,
};
