//! 二维柏林噪声
//!
//! 排列表由种子决定：相同种子、相同输入得到完全相同的输出。
//! 构造完成后不再有内部状态，可以在多个区块生成之间只读共享。

use noise::NoiseFn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// 带种子的二维梯度噪声，输出大致位于 [-1, 1]
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    seed: u64,
    /// 复制成512长度，查表时无需取模
    perm: [u8; 512],
}

impl PerlinNoise {
    pub fn new(seed: u64) -> Self {
        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher–Yates 洗牌，从255倒序到1
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        for i in (1..256usize).rev() {
            let j = rng.gen_range(0..=i);
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 在 (x, y) 处采样
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;

        let xf = x - fx;
        let yf = y - fy;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);

        lerp(x1, x2, v)
    }
}

impl NoiseFn<f64, 2> for PerlinNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise(point[0], point[1])
    }
}

/// 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// 由哈希低两位选取梯度方向
#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
