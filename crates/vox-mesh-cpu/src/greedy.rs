use vox_blocks::VoxelType;

use crate::mask::FaceMask;

/// Covers every active cell of `mask` with maximal same-type rectangles.
///
/// Cells are scanned row-major (rows along `V1`, columns along `V2`). Each
/// rectangle first grows along `V2` (its width), then along `V1` (its height)
/// while the whole next row matches. Covered cells are deactivated, so every
/// active cell lands in exactly one rectangle.
///
/// `emit` receives `(v1, v2, width, height, ty)`.
pub fn greedy_rects(
    mask: &mut FaceMask,
    mut emit: impl FnMut(usize, usize, usize, usize, VoxelType),
) {
    let (width, height) = (mask.width(), mask.height());
    for v1 in 0..height {
        let mut v2 = 0;
        while v2 < width {
            let cell = mask.get(v1, v2);
            if !cell.active {
                v2 += 1;
                continue;
            }
            let ty = cell.ty;
            let mut w = 1;
            while v2 + w < width && mask.get(v1, v2 + w).merges_with(ty) {
                w += 1;
            }
            let mut h = 1;
            'expand: while v1 + h < height {
                for k in 0..w {
                    if !mask.get(v1 + h, v2 + k).merges_with(ty) {
                        break 'expand;
                    }
                }
                h += 1;
            }
            emit(v1, v2, w, h, ty);
            for r in 0..h {
                for c in 0..w {
                    mask.deactivate(v1 + r, v2 + c);
                }
            }
            v2 += w;
        }
    }
}
