//! # 像素网格模块
//!
//! [`PixelGrid`] 是隐写核心唯一操作的像素表示：固定大小、每通道 8 位的 RGBA。
//! 任何输入颜色模型都先在这里被规范化，编解码器本身不关心图像来源。
//!
//! ## 遍历顺序
//!
//! 网格按**列优先**遍历：外层 `x` 从 `0` 到 `width`，内层 `y` 从 `0` 到 `height`。
//! 这个顺序是嵌入格式的一部分，编码端和解码端必须一致，不能改成常见的行优先顺序。

use crate::constants::CHANNELS_PER_PIXEL;
use image::{DynamicImage, GenericImageView, Pixel, Rgba, RgbaImage};
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    image: RgbaImage,
}

impl PixelGrid {
    /// 把任意颜色模型的图像转换为 8 位 RGBA 网格。
    ///
    /// 通道直接复制，不做重采样：灰度展开为 R=G=B，缺失的 alpha 补为 255。
    /// 对 8 位输入是无损的；16 位或浮点输入会被降到 8 位。
    pub fn from_source(image: &DynamicImage) -> Self {
        let color = image.color();
        if color.bytes_per_pixel() > color.channel_count() {
            warn!(
                "Carrier uses {:?}, channels are reduced to 8 bits before hiding",
                color
            );
        }
        Self {
            image: image.to_rgba8(),
        }
    }

    /// 复制一个 8 位视图的可见区域。
    ///
    /// 视图的坐标原点不必是 (0, 0)，结果网格的尺寸等于视图自身的宽高。
    pub fn from_view<V>(view: &V) -> Self
    where
        V: GenericImageView,
        V::Pixel: Pixel<Subpixel = u8>,
    {
        let (width, height) = view.dimensions();
        Self {
            image: RgbaImage::from_fn(width, height, |x, y| view.get_pixel(x, y).to_rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 读取 (x, y) 处的像素。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic，不会被截断到边界内。
    pub fn at(&self, x: u32, y: u32) -> Rgba<u8> {
        self.check_bounds(x, y);
        *self.image.get_pixel(x, y)
    }

    /// 写入 (x, y) 处的像素。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic。
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        self.check_bounds(x, y);
        self.image.put_pixel(x, y, pixel);
    }

    /// 按列优先顺序产出所有坐标。
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let (width, height) = (self.width(), self.height());
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    /// 按遍历顺序产出每个像素的 R, G, B 通道值 (跳过 alpha)。
    pub fn color_channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.coordinates().flat_map(move |(x, y)| {
            let Rgba([r, g, b, _]) = self.at(x, y);
            [r, g, b]
        })
    }

    /// 网格中可用于隐写的通道总数，即可存放的位数。
    pub fn channel_count(&self) -> u64 {
        (u64::from(self.width()) * u64::from(self.height()))
            .saturating_mul(CHANNELS_PER_PIXEL as u64)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn check_bounds(&self, x: u32, y: u32) {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) is outside the {}x{} grid",
            self.width(),
            self.height()
        );
    }
}

impl From<RgbaImage> for PixelGrid {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn numbered_grid(width: u32, height: u32) -> PixelGrid {
        PixelGrid::from(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, (x * 10 + y) as u8, 200])
        }))
    }

    #[test]
    fn coordinates_are_column_major() {
        let grid = numbered_grid(3, 2);
        let order: Vec<(u32, u32)> = grid.coordinates().collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn color_channels_skip_alpha_in_traversal_order() {
        let grid = numbered_grid(2, 2);
        let channels: Vec<u8> = grid.color_channels().collect();
        assert_eq!(channels, vec![0, 0, 0, 0, 1, 1, 1, 0, 10, 1, 1, 11]);
        assert_eq!(grid.channel_count(), 12);
    }

    #[test]
    fn rgb_source_gets_opaque_alpha() {
        let rgb = RgbImage::from_pixel(2, 3, Rgb([1, 2, 3]));
        let grid = PixelGrid::from_source(&DynamicImage::ImageRgb8(rgb));
        assert_eq!((grid.width(), grid.height()), (2, 3));
        assert_eq!(grid.at(1, 2), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn gray_source_is_expanded() {
        let gray = GrayImage::from_pixel(1, 1, Luma([77]));
        let grid = PixelGrid::from_source(&DynamicImage::ImageLuma8(gray));
        assert_eq!(grid.at(0, 0), Rgba([77, 77, 77, 255]));
    }

    #[test]
    fn rgba_source_is_copied_losslessly() {
        let grid = numbered_grid(4, 4);
        let copy = PixelGrid::from_source(&DynamicImage::ImageRgba8(grid.as_image().clone()));
        assert_eq!(copy, grid);
    }

    #[test]
    fn view_with_offset_origin_keeps_its_own_bounds() {
        let source = numbered_grid(6, 5).into_image();
        let view = source.view(2, 1, 3, 2);
        let grid = PixelGrid::from_view(&*view);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.at(0, 0), *source.get_pixel(2, 1));
        assert_eq!(grid.at(2, 1), *source.get_pixel(4, 2));
    }

    #[test]
    fn set_then_at_round_trips() {
        let mut grid = numbered_grid(2, 2);
        grid.set(1, 0, Rgba([9, 8, 7, 6]));
        assert_eq!(grid.at(1, 0), Rgba([9, 8, 7, 6]));
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn out_of_bounds_access_panics() {
        numbered_grid(2, 2).at(2, 0);
    }
}
