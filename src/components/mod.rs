pub mod svg_map;
