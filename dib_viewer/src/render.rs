use lib_dib::surface::SurfaceError;
use lib_dib::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mutates a surface whenever the window has nothing else to do.
pub trait Renderer {
    fn render(&mut self, surface: &mut Surface) -> Result<(), SurfaceError>;
}

/// Plots random colours at random coordinates.
pub struct RandomPixels {
    rng: StdRng,
    pixels_per_frame: usize,
}

impl RandomPixels {
    pub fn new(pixels_per_frame: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), pixels_per_frame)
    }

    pub fn seeded(seed: u64, pixels_per_frame: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), pixels_per_frame)
    }

    fn with_rng(rng: StdRng, pixels_per_frame: usize) -> Self {
        Self {
            rng,
            pixels_per_frame,
        }
    }
}

impl Renderer for RandomPixels {
    fn render(&mut self, surface: &mut Surface) -> Result<(), SurfaceError> {
        let (width, height) = surface.dimensions();
        for _ in 0..self.pixels_per_frame {
            let x = self.rng.gen_range(0..width);
            let y = self.rng.gen_range(0..height);
            let [r, g, b]: [u8; 3] = self.rng.gen();
            surface.put_pixel(x, y, r, g, b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_dib::create_surface;

    #[test]
    fn test_random_pixels_stay_in_bounds() {
        for bpp in [8, 15, 16, 24, 32] {
            let mut surface = create_surface(7, 3, bpp).unwrap();
            let mut renderer = RandomPixels::seeded(42, 500);
            assert!(renderer.render(&mut surface).is_ok());
        }
    }

    #[test]
    fn test_random_pixels_change_the_surface() {
        let mut surface = create_surface(32, 32, 32).unwrap();
        let mut renderer = RandomPixels::seeded(7, 64);
        renderer.render(&mut surface).unwrap();

        assert!(surface.pixels().as_bytes().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_seeded_renderers_agree() {
        let mut first = create_surface(16, 16, 24).unwrap();
        let mut second = create_surface(16, 16, 24).unwrap();
        RandomPixels::seeded(1, 100).render(&mut first).unwrap();
        RandomPixels::seeded(1, 100).render(&mut second).unwrap();

        assert_eq!(first, second);
    }
}
