//! Projection of sparse weighted entries onto the TT tangent space.
//!
//! Given left-orthogonal cores U, right-orthogonal cores V and samples
//! `(i⁽ʲ⁾, wⱼ)`, the tangent component of core k is
//!
//! ```text
//! δX_k[i_k] = Σⱼ wⱼ · (U₀[i₀] ⋯ U_{k-1}[i_{k-1}])ᵀ ⊗ (V_{k+1}[i_{k+1}] ⋯ V_{d-1}[i_{d-1}])
//! ```
//!
//! summed over the samples whose k-th coordinate is `i_k`.
//!
//! # Algorithm
//!
//! Each sample is handled by two sweeps:
//!
//! 1. **Left sweep**: `L₀ = U₀[i₀]`, then `L_k = U_k[i_k]ᵀ · L_{k-1}` for
//!    `k = 1 … d-2`. All left environments are kept in scratch.
//! 2. **Right sweep**: the last core receives `w · L_{d-2}`. Starting from
//!    `c = V_{d-1}[i_{d-1}]`, each interior core k (from `d-2` down to 1)
//!    receives the rank-1 update `w · L_{k-1} ⊗ c`, after which
//!    `c ← V_k[i_k] · c`. The first core finally receives `w · c`.
//!
//! Only one right environment is live at a time, so the cost per sample is
//! O(d · r²) and the full tensor is never formed.
//!
//! # Complexity
//!
//! Time O(numSamples · d · r²), extra memory O(d · r) for scratch plus one
//! accumulator set (one per chunk when running in parallel).
//!
//! # References
//!
//! - Steinlechner, M. (2016). "Riemannian optimization for high-dimensional tensor completion"
//! - Lubich, C., Oseledets, I. V., & Vandereycken, B. (2015). "Time integration of tensor trains"

use crate::accumulator::TangentCores;
use crate::config::ProjectionConfig;
use crate::cores::CoreFamily;
use crate::dense;
use crate::error::{ProjectionError, ProjectionResult};
use crate::samples::SampleSet;
use crate::shape::TtShape;
use scirs2_core::numeric::Float;

/// Working memory for one sample sweep.
///
/// Holds the d-1 left environments and the right environment, each padded to
/// the maximum rank. Allocated once per call (or per parallel chunk) and fully
/// overwritten, in the parts that are read, by every sample.
#[derive(Debug, Clone)]
pub struct ProjectionScratch<T> {
    max_rank: usize,
    left: Vec<T>,
    current: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Float> ProjectionScratch<T> {
    /// Scratch sized for `shape`.
    pub fn new(shape: &TtShape) -> Self {
        let max_rank = shape.max_rank();
        Self {
            max_rank,
            left: vec![T::zero(); max_rank * (shape.order() - 1)],
            current: vec![T::zero(); max_rank],
            tmp: vec![T::zero(); max_rank],
        }
    }

    /// Left environment `L_k` of the last processed sample, `r_{k+1}` long.
    pub fn left_environment(&self, shape: &TtShape, k: usize) -> &[T] {
        let start = self.max_rank * k;
        &self.left[start..start + shape.ranks()[k + 1]]
    }

    fn fits(&self, shape: &TtShape) -> bool {
        self.max_rank >= shape.max_rank() && self.left.len() >= self.max_rank * (shape.order() - 1)
    }
}

/// Add the contribution of one sample into `acc`.
///
/// `index` is the zero-based multi-index of the sample. Nothing is written
/// unless all inputs agree on one shape and the index is in range.
///
/// # Errors
///
/// - [`ProjectionError::ShapeMismatch`] if U, V or `acc` differ in shape, or
///   `scratch` is too small for it
/// - [`ProjectionError::OrderMismatch`] / [`ProjectionError::IndexOutOfRange`]
///   if `index` does not address an entry of the shape
pub fn project_sample<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    index: &[usize],
    weight: T,
    scratch: &mut ProjectionScratch<T>,
    acc: &mut TangentCores<T>,
) -> ProjectionResult<()> {
    let shape = u.shape();
    check_same_shape(u, v)?;
    check_accumulator(shape, acc)?;

    if !scratch.fits(shape) {
        return Err(ProjectionError::shape_mismatch(format!(
            "scratch for max rank {} and {} modes cannot hold ranks {:?}",
            scratch.max_rank,
            scratch.left.len() / scratch.max_rank.max(1) + 1,
            shape.ranks()
        )));
    }

    if index.len() != shape.order() {
        return Err(ProjectionError::OrderMismatch {
            expected: shape.order(),
            actual: index.len(),
        });
    }

    for (mode, (&idx, &bound)) in index.iter().zip(shape.mode_sizes()).enumerate() {
        if idx >= bound {
            return Err(ProjectionError::IndexOutOfRange {
                sample: 0,
                mode,
                index: idx + 1,
                bound,
            });
        }
    }

    sweep_sample(u, v, index, weight, scratch, acc);
    Ok(())
}

/// Per-sample sweep on inputs that were already checked against one shape.
fn sweep_sample<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    index: &[usize],
    weight: T,
    scratch: &mut ProjectionScratch<T>,
    acc: &mut TangentCores<T>,
) {
    let shape = u.shape();
    let d = shape.order();
    let r = shape.ranks();
    let m = scratch.max_rank;

    let ProjectionScratch {
        left, current, tmp, ..
    } = scratch;

    // Left sweep: L_0 = U_0[i_0], L_k = U_k[i_k]^T L_{k-1}
    dense::copy(u.slice(0, index[0]), &mut left[..r[1]]);
    for k in 1..d - 1 {
        let (done, rest) = left.split_at_mut(m * k);
        let prev = &done[m * (k - 1)..m * (k - 1) + r[k]];
        dense::gemv_t(u.slice(k, index[k]), r[k], r[k + 1], prev, &mut rest[..r[k + 1]]);
    }

    // Last core has no right environment
    let last = m * (d - 2);
    dense::axpy(
        weight,
        &left[last..last + r[d - 1]],
        acc.slice_mut(d - 1, index[d - 1]),
    );

    // Right sweep with a single running environment
    dense::copy(v.slice(d - 1, index[d - 1]), &mut current[..r[d - 1]]);
    for k in (1..d - 1).rev() {
        let env = &left[m * (k - 1)..m * (k - 1) + r[k]];
        dense::ger(
            weight,
            env,
            &current[..r[k + 1]],
            acc.slice_mut(k, index[k]),
            r[k],
            r[k + 1],
        );

        dense::gemv_n(
            v.slice(k, index[k]),
            r[k],
            r[k + 1],
            &current[..r[k + 1]],
            &mut tmp[..r[k]],
        );
        std::mem::swap(current, tmp);
    }

    // First core has no left environment
    dense::axpy(weight, &current[..r[1]], acc.slice_mut(0, index[0]));
}

fn check_same_shape<T: Float>(u: &CoreFamily<'_, T>, v: &CoreFamily<'_, T>) -> ProjectionResult<()> {
    if u.shape() != v.shape() {
        return Err(ProjectionError::shape_mismatch(format!(
            "{} cores have ranks {:?} / modes {:?}, {} cores have ranks {:?} / modes {:?}",
            u.name(),
            u.shape().ranks(),
            u.shape().mode_sizes(),
            v.name(),
            v.shape().ranks(),
            v.shape().mode_sizes()
        )));
    }
    Ok(())
}

fn check_accumulator<T: Float>(shape: &TtShape, acc: &TangentCores<T>) -> ProjectionResult<()> {
    if acc.shape() != shape {
        return Err(ProjectionError::shape_mismatch(format!(
            "accumulator ranks {:?} / modes {:?} do not match core ranks {:?} / modes {:?}",
            acc.shape().ranks(),
            acc.shape().mode_sizes(),
            shape.ranks(),
            shape.mode_sizes()
        )));
    }
    Ok(())
}

/// Reject inconsistent inputs before any accumulator is touched.
fn validate_inputs<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
    acc: Option<&TangentCores<T>>,
) -> ProjectionResult<()> {
    let result = check_same_shape(u, v)
        .and_then(|_| match acc {
            Some(acc) => check_accumulator(u.shape(), acc),
            None => Ok(()),
        })
        .and_then(|_| samples.validate_against(u.shape()));

    result.map_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %e, "rejected tangent projection input");
        e
    })
}

/// Run samples `[start, end)` through the sweep, accumulating into `acc`.
fn accumulate_range<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
    start: usize,
    end: usize,
    scratch: &mut ProjectionScratch<T>,
    acc: &mut TangentCores<T>,
) {
    for j in start..end {
        sweep_sample(u, v, samples.index(j), samples.weight(j), scratch, acc);
    }
}

/// Project weighted samples onto the tangent space (serial).
///
/// Returns one accumulator per core, shaped like the input cores.
///
/// # Errors
///
/// - [`ProjectionError::ShapeMismatch`] if U and V were bound to different shapes
/// - [`ProjectionError::OrderMismatch`] / [`ProjectionError::IndexOutOfRange`]
///   if the samples do not fit the shape
///
/// # Example
///
/// ```rust
/// use tenrso_tangent::{tt_tangent_project, CoreFamily, SampleSet, TtShape};
///
/// let shape = TtShape::new(vec![2, 2], vec![1, 2, 1]).unwrap();
/// let u = vec![vec![1.0, 2.0, 3.0, 4.0], vec![0.0; 4]];
/// let v = vec![vec![0.0; 4], vec![5.0, 6.0, 7.0, 8.0]];
/// let u = CoreFamily::from_vecs("U", &shape, &u).unwrap();
/// let v = CoreFamily::from_vecs("V", &shape, &v).unwrap();
///
/// // One sample at (1, 2), one-based, with weight 2
/// let samples = SampleSet::from_one_based(2, vec![1, 2], vec![2.0]).unwrap();
/// let result = tt_tangent_project(&u, &v, &samples).unwrap();
///
/// assert_eq!(result.slice(0, 0), &[14.0, 16.0]); // 2 · V_1[1]
/// assert_eq!(result.slice(1, 1), &[2.0, 4.0]); // 2 · U_0[0]
/// ```
pub fn tt_tangent_project<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
) -> ProjectionResult<TangentCores<T>> {
    validate_inputs(u, v, samples, None)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        order = u.shape().order(),
        samples = samples.len(),
        max_rank = u.shape().max_rank(),
        "serial tangent projection"
    );

    let mut acc = TangentCores::zeros(u.shape());
    let mut scratch = ProjectionScratch::new(u.shape());
    accumulate_range(u, v, samples, 0, samples.len(), &mut scratch, &mut acc);
    Ok(acc)
}

/// Project weighted samples and add the result into existing accumulators.
///
/// Projecting a batch in several pieces with this function gives the same
/// result (up to rounding) as one call on the concatenated batch.
///
/// # Errors
///
/// As [`tt_tangent_project`], plus [`ProjectionError::ShapeMismatch`] if `acc`
/// has a different shape than the cores.
pub fn tt_tangent_project_into<T: Float>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
    acc: &mut TangentCores<T>,
) -> ProjectionResult<()> {
    validate_inputs(u, v, samples, Some(&*acc))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        order = u.shape().order(),
        samples = samples.len(),
        "accumulating tangent projection"
    );

    let mut scratch = ProjectionScratch::new(u.shape());
    accumulate_range(u, v, samples, 0, samples.len(), &mut scratch, acc);
    Ok(())
}

/// Project weighted samples onto the tangent space in parallel.
///
/// Samples are split into contiguous chunks of `chunk_size`. Each chunk owns
/// its scratch and a private accumulator; partial results are summed in chunk
/// order, so the output is deterministic for a fixed chunk size and differs
/// from [`tt_tangent_project`] only by summation order.
///
/// # Errors
///
/// As [`tt_tangent_project`], plus [`ProjectionError::InvalidConfig`] if
/// `chunk_size` is zero.
#[cfg(feature = "parallel")]
pub fn tt_tangent_project_parallel<T>(
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
    chunk_size: usize,
) -> ProjectionResult<TangentCores<T>>
where
    T: Float + Send + Sync,
{
    use scirs2_core::parallel_ops::*;

    if chunk_size == 0 {
        return Err(ProjectionError::invalid_config(
            "chunk size must be greater than 0",
        ));
    }

    validate_inputs(u, v, samples, None)?;

    let shape = u.shape();
    let n_samples = samples.len();
    let n_chunks = n_samples.div_ceil(chunk_size);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        order = shape.order(),
        samples = n_samples,
        max_rank = shape.max_rank(),
        chunks = n_chunks,
        "parallel tangent projection"
    );

    let partials: Vec<TangentCores<T>> = (0..n_chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * chunk_size;
            let end = (start + chunk_size).min(n_samples);

            let mut partial = TangentCores::zeros(shape);
            let mut scratch = ProjectionScratch::new(shape);
            accumulate_range(u, v, samples, start, end, &mut scratch, &mut partial);
            partial
        })
        .collect();

    let mut acc = TangentCores::zeros(shape);
    for partial in &partials {
        acc.merge(partial)?;
    }

    Ok(acc)
}

/// Project weighted samples using the scheduling chosen by `config`.
///
/// # Errors
///
/// As [`tt_tangent_project`], plus [`ProjectionError::InvalidConfig`] for an
/// unusable configuration.
pub fn tt_tangent_project_with<T>(
    config: &ProjectionConfig,
    u: &CoreFamily<'_, T>,
    v: &CoreFamily<'_, T>,
    samples: &SampleSet<T>,
) -> ProjectionResult<TangentCores<T>>
where
    T: Float + Send + Sync,
{
    config.validate()?;

    #[cfg(feature = "parallel")]
    {
        if config.use_parallel(samples.len()) {
            return tt_tangent_project_parallel(u, v, samples, config.chunk_size);
        }
    }

    tt_tangent_project(u, v, samples)
}

/// Tangent projector bound to an execution configuration.
///
/// Holds no numerical state; every call is independent.
///
/// # Example
///
/// ```rust
/// use tenrso_tangent::{CoreFamily, ProjectionConfig, SampleSet, TangentProjector, TtShape};
///
/// let shape = TtShape::uniform(vec![3, 3, 3], 2).unwrap();
/// let cores: Vec<Vec<f64>> = (0..3).map(|i| vec![0.5; shape.core_len(i)]).collect();
/// let u = CoreFamily::from_vecs("U", &shape, &cores).unwrap();
/// let v = CoreFamily::from_vecs("V", &shape, &cores).unwrap();
/// let samples = SampleSet::from_zero_based(3, vec![0, 1, 2, 2, 2, 2], vec![1.0, -1.0]).unwrap();
///
/// let projector = TangentProjector::new(ProjectionConfig::serial()).unwrap();
/// let result = projector.project(&u, &v, &samples).unwrap();
/// assert_eq!(result.order(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TangentProjector {
    config: ProjectionConfig,
}

impl TangentProjector {
    /// Create a projector, validating the configuration.
    pub fn new(config: ProjectionConfig) -> ProjectionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Projector configured from `TENRSO_PROJECTION_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            config: ProjectionConfig::from_env(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project samples into fresh accumulators.
    pub fn project<T>(
        &self,
        u: &CoreFamily<'_, T>,
        v: &CoreFamily<'_, T>,
        samples: &SampleSet<T>,
    ) -> ProjectionResult<TangentCores<T>>
    where
        T: Float + Send + Sync,
    {
        tt_tangent_project_with(&self.config, u, v, samples)
    }

    /// Project samples and add them into `acc`.
    pub fn project_into<T>(
        &self,
        u: &CoreFamily<'_, T>,
        v: &CoreFamily<'_, T>,
        samples: &SampleSet<T>,
        acc: &mut TangentCores<T>,
    ) -> ProjectionResult<()>
    where
        T: Float + Send + Sync,
    {
        if self.config.use_parallel(samples.len()) {
            validate_inputs(u, v, samples, Some(&*acc))?;
            let batch = tt_tangent_project_with(&self.config, u, v, samples)?;
            return acc.merge(&batch);
        }
        tt_tangent_project_into(u, v, samples, acc)
    }
}
