//! Tests for model defaults and limits

#[cfg(test)]
mod tests {
    use markovtex::io::configuration::{
        COMPONENTS_PER_STEP, DEFAULT_HEIGHT, DEFAULT_MAX_CONTEXT_LENGTH, DEFAULT_SEARCH_RADIUS,
        DEFAULT_SEED, DEFAULT_TILE_SIZE, DEFAULT_WIDTH, MAX_CONTEXT_LENGTH, MAX_GRID_DIMENSION,
        MODEL_EXTENSION, OUTPUT_SUFFIX, PROGRESS_UPDATE_INTERVAL,
    };

    // Tests the default context length is usable
    #[test]
    fn test_context_length_bounds() {
        assert_eq!(DEFAULT_MAX_CONTEXT_LENGTH, 2);
        assert!(DEFAULT_MAX_CONTEXT_LENGTH <= MAX_CONTEXT_LENGTH);
    }

    // Tests each step contributes one RGB triple
    #[test]
    fn test_components_per_step() {
        assert_eq!(COMPONENTS_PER_STEP, 3);
    }

    // Tests the default radius tolerates averaging noise only
    #[test]
    fn test_search_radius() {
        assert!(DEFAULT_SEARCH_RADIUS > 0.0);
        assert!(DEFAULT_SEARCH_RADIUS < 255.0);
    }

    // Tests default output dimensions fit within the limit
    #[test]
    fn test_default_dimensions() {
        assert_eq!((DEFAULT_WIDTH, DEFAULT_HEIGHT), (100, 50));
        assert!(DEFAULT_WIDTH <= MAX_GRID_DIMENSION);
        assert!(DEFAULT_HEIGHT <= MAX_GRID_DIMENSION);
        assert_eq!(DEFAULT_TILE_SIZE, 1);
    }

    // Tests the fixed seed and file naming constants
    #[test]
    fn test_naming_and_seed() {
        assert_eq!(DEFAULT_SEED, 42);
        assert_eq!(OUTPUT_SUFFIX, "_result");
        assert_eq!(MODEL_EXTENSION, "model");
        assert!(PROGRESS_UPDATE_INTERVAL > 0);
    }
}
