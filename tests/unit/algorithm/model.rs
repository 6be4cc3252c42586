//! Tests for model construction and the fitting pass

#[cfg(test)]
mod tests {
    use markovtex::algorithm::model::Model;
    use markovtex::spatial::tiles::{Tile, TileRaster};

    fn raster_from_rows(rows: &[&[[u8; 3]]]) -> TileRaster {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let pixels: Vec<[u8; 3]> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        TileRaster::extract_tiles(&pixels, width, height, 1).unwrap()
    }

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    // Tests a single-color raster yields one nullary entry counted per position
    #[test]
    fn test_fit_single_color() {
        let raster = raster_from_rows(&[&[RED, RED], &[RED, RED]]);
        let mut model = Model::new(1, 1).unwrap();

        let summary = model.fit(&raster).unwrap();

        assert_eq!(model.nullary().len(), 1);
        assert!((model.nullary().weight(&Tile::pixel(RED)) - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.positions, 4);
        // 4 empty contexts + 4 single-step chains (two at (1,1), one each on the edges)
        assert_eq!(summary.observations, 8);
        assert_eq!(summary.new_contexts, 1);

        let index = model.index(1).unwrap();
        assert_eq!(index.len(), 1);
        let stored = index.get(&[255.0, 0.0, 0.0]).unwrap().unwrap();
        assert!((stored.grand_total() - 4.0).abs() < f64::EPSILON);
    }

    // Tests successors are recorded against the exact predecessor colors
    #[test]
    fn test_fit_records_successors() {
        let raster = raster_from_rows(&[&[RED, BLUE, RED, BLUE]]);
        let mut model = Model::new(2, 1).unwrap();
        model.fit(&raster).unwrap();

        let after_red = model.index(1).unwrap().get(&[255.0, 0.0, 0.0]).unwrap().unwrap();
        assert_eq!(after_red.len(), 1);
        assert!((after_red.weight(&Tile::pixel(BLUE)) - 2.0).abs() < f64::EPSILON);

        // Nearest predecessor first: red at x=2, then blue at x=1
        let after_blue_red = model
            .index(2)
            .unwrap()
            .get(&[255.0, 0.0, 0.0, 0.0, 0.0, 255.0])
            .unwrap()
            .unwrap();
        assert_eq!(after_blue_red.len(), 1);
        assert!((after_blue_red.weight(&Tile::pixel(BLUE)) - 1.0).abs() < f64::EPSILON);
    }

    // Tests boundary contexts are folded in at their own arity
    #[test]
    fn test_fit_keeps_truncated_contexts() {
        let raster = raster_from_rows(&[&[RED, BLUE]]);
        let mut model = Model::new(3, 1).unwrap();
        model.fit(&raster).unwrap();

        let statistics = model.statistics();
        assert_eq!(statistics.nullary_tiles, 2);
        assert_eq!(statistics.contexts_per_arity, vec![1, 0, 0]);
    }

    // Tests fitting twice accumulates counts
    #[test]
    fn test_fit_accumulates_across_rasters() {
        let raster = raster_from_rows(&[&[RED, BLUE]]);
        let mut model = Model::new(1, 1).unwrap();
        model.fit(&raster).unwrap();
        let summary = model.fit(&raster).unwrap();

        assert_eq!(summary.new_contexts, 0);
        assert!((model.nullary().grand_total() - 4.0).abs() < f64::EPSILON);
    }

    // Tests construction limits and mismatched rasters
    #[test]
    fn test_invalid_configuration() {
        assert!(Model::new(2, 0).is_err());
        assert!(Model::new(99, 1).is_err());

        let mut model = Model::new(1, 2).unwrap();
        let raster = raster_from_rows(&[&[RED, BLUE]]);
        assert!(model.fit(&raster).is_err());

        let mut sparse = TileRaster::new(2, 1, 1).unwrap();
        sparse.set(0, 0, Tile::pixel(RED)).unwrap();
        let mut model = Model::new(1, 1).unwrap();
        assert!(model.fit(&sparse).is_err());
    }

    // Tests a raster can only carry tiles the model can fold in
    #[test]
    fn test_oversized_tile_never_reaches_fit() {
        let mut raster = TileRaster::new(1, 1, 1).unwrap();
        assert!(raster.set(0, 0, Tile::new(vec![[1, 2, 3]; 4])).is_err());

        let mut model = Model::new(1, 1).unwrap();
        assert!(model.fit(&raster).is_err());
        assert!(model.nullary().is_empty());
    }

    // Tests index depth is reported per arity
    #[test]
    fn test_statistics_depth() {
        let raster = raster_from_rows(&[&[RED, BLUE, RED, BLUE]]);
        let mut model = Model::new(2, 1).unwrap();
        model.fit(&raster).unwrap();

        let statistics = model.statistics();
        // Arity one holds red and blue, arity two holds (red, blue) and (blue, red)
        assert_eq!(statistics.contexts_per_arity, vec![2, 2]);
        assert_eq!(statistics.depth_per_arity, vec![2, 2]);
    }

    // Tests progress is reported once per position
    #[test]
    fn test_fit_progress_callback() {
        let raster = raster_from_rows(&[&[RED, BLUE, RED], &[BLUE, RED, BLUE]]);
        let mut model = Model::new(2, 1).unwrap();
        let mut reported = Vec::new();

        model
            .fit_with_progress(&raster, |done| reported.push(done))
            .unwrap();

        assert_eq!(reported, (1..=6).collect::<Vec<_>>());
        assert_eq!(model.max_n(), 2);
        assert_eq!(model.tile_size(), 1);
        assert!(model.index(0).is_none());
        assert!(model.index(3).is_none());
    }
}
