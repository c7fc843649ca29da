//! Lane-width byte comparison for substring search
//!
//! This module provides the byte-level pre-filter used by the vector matcher:
//! at each candidate offset a fixed-width window of text is compared against
//! the first lane of the pattern in one step, and only a full-lane hit goes
//! on to a linear check of the remaining pattern bytes.
//!
//! Uses platform-specific SIMD intrinsics:
//! - x86_64: SSE2 for 16-byte lanes, AVX2 (runtime detected) for 32-byte lanes
//! - aarch64: NEON (16 bytes per compare, two compares for a 32-byte lane)
//! - Other: scalar lane compare
//!
//! The scalar path defines the answer. Every vector path must agree with it.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Search strategy picked from a pattern's byte length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneWidth {
    /// Byte-by-byte scan (patterns shorter than 16 bytes)
    Scalar,
    /// 16-byte lanes (patterns of 16 to 31 bytes)
    W16,
    /// 32-byte lanes (patterns of 32 bytes or more)
    W32,
}

impl LaneWidth {
    /// Pick the widest lane that fits inside the pattern
    pub fn for_len(len: usize) -> Self {
        if len >= 32 {
            LaneWidth::W32
        } else if len >= 16 {
            LaneWidth::W16
        } else {
            LaneWidth::Scalar
        }
    }

    /// Bytes compared per step (1 for the scalar scan)
    pub fn bytes(self) -> usize {
        match self {
            LaneWidth::Scalar => 1,
            LaneWidth::W16 => 16,
            LaneWidth::W32 => 32,
        }
    }
}

/// Check whether `needle` occurs in `haystack` using the given strategy
///
/// A lane width wider than the needle falls back to the byte scan.
pub fn contains(haystack: &[u8], needle: &[u8], width: LaneWidth) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    if needle.len() < width.bytes() {
        return contains_naive(haystack, needle);
    }

    match width {
        LaneWidth::Scalar => contains_naive(haystack, needle),
        LaneWidth::W16 => contains_lanes::<16>(haystack, needle),
        LaneWidth::W32 => contains_lanes::<32>(haystack, needle),
    }
}

/// Byte-by-byte substring scan
pub fn contains_naive(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }

    'outer: for start in 0..=haystack.len() - needle.len() {
        for (j, &b) in needle.iter().enumerate() {
            if haystack[start + j] != b {
                continue 'outer;
            }
        }
        return true;
    }
    false
}

/// Lane scan: full-lane compare at every offset, then the tail
///
/// Caller guarantees `needle.len() >= N` and `haystack.len() >= needle.len()`,
/// so the window at every candidate offset is in bounds.
fn contains_lanes<const N: usize>(haystack: &[u8], needle: &[u8]) -> bool {
    debug_assert!(needle.len() >= N);
    let lane_eq = select_lane_eq::<N>();
    let last_start = haystack.len() - needle.len();
    let head = &needle[..N];
    let tail = &needle[N..];

    for start in 0..=last_start {
        let window = &haystack[start..start + N];
        if lane_eq(window, head) && tail_eq(&haystack[start + N..], tail) {
            return true;
        }
    }
    false
}

#[inline]
fn tail_eq(text: &[u8], tail: &[u8]) -> bool {
    for (i, &b) in tail.iter().enumerate() {
        if text[i] != b {
            return false;
        }
    }
    true
}

/// Signature shared by every lane compare
type LaneEq = fn(&[u8], &[u8]) -> bool;

/// Pick the best `N`-byte lane compare for this CPU
///
/// Feature detection happens here, once per search, never per offset.
fn select_lane_eq<const N: usize>() -> LaneEq {
    #[cfg(target_arch = "x86_64")]
    {
        if N == 32 && is_x86_feature_detected!("avx2") {
            return lane_eq32_avx2_detected;
        }
        if N % 16 == 0 {
            return lane_eq_sse2_baseline;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if N % 16 == 0 {
            return lane_eq_neon_baseline;
        }
    }

    lane_eq_scalar
}

/// Compare two `N`-byte lanes with the best implementation
#[cfg(test)]
fn lane_eq<const N: usize>(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == N && b.len() == N);
    select_lane_eq::<N>()(a, b)
}

#[cfg(target_arch = "x86_64")]
fn lane_eq32_avx2_detected(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == 32 && b.len() == 32);
    // SAFETY: only handed out by select_lane_eq after AVX2 was detected;
    // both slices hold 32 bytes.
    unsafe { lane_eq32_avx2(a, b) }
}

#[cfg(target_arch = "x86_64")]
fn lane_eq_sse2_baseline(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == b.len());
    // SAFETY: SSE2 is part of the x86_64 baseline; slices have equal length.
    unsafe { lane_eq_sse2(a, b) }
}

#[cfg(target_arch = "aarch64")]
fn lane_eq_neon_baseline(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == b.len());
    // SAFETY: NEON is guaranteed on aarch64; slices have equal length.
    unsafe { lane_eq_neon(a, b) }
}

/// Scalar lane compare, the reference for the vector paths
#[inline(always)]
pub fn lane_eq_scalar(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Compare 16-byte chunks with SSE2 (x86_64)
///
/// Loads unaligned 16-byte chunks, compares element-wise and requires the
/// movemask to have all 16 bits set.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn lane_eq_sse2(a: &[u8], b: &[u8]) -> bool {
    let mut i = 0;
    while i + 16 <= a.len() {
        let va = _mm_loadu_si128(a.as_ptr().add(i) as *const __m128i);
        let vb = _mm_loadu_si128(b.as_ptr().add(i) as *const __m128i);
        let eq = _mm_cmpeq_epi8(va, vb);
        if _mm_movemask_epi8(eq) != 0xFFFF {
            return false;
        }
        i += 16;
    }
    true
}

/// Compare a 32-byte lane with AVX2 (x86_64)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn lane_eq32_avx2(a: &[u8], b: &[u8]) -> bool {
    let va = _mm256_loadu_si256(a.as_ptr() as *const __m256i);
    let vb = _mm256_loadu_si256(b.as_ptr() as *const __m256i);
    let eq = _mm256_cmpeq_epi8(va, vb);
    // All 32 mask bits set reads back as -1
    _mm256_movemask_epi8(eq) == -1
}

/// Compare 16-byte chunks with NEON (aarch64)
#[cfg(target_arch = "aarch64")]
unsafe fn lane_eq_neon(a: &[u8], b: &[u8]) -> bool {
    let mut i = 0;
    while i + 16 <= a.len() {
        let va = vld1q_u8(a.as_ptr().add(i));
        let vb = vld1q_u8(b.as_ptr().add(i));
        let eq = vceqq_u8(va, vb);
        // Every lane is 0xFF only when all bytes matched
        if vminvq_u8(eq) != 0xFF {
            return false;
        }
        i += 16;
    }
    true
}
