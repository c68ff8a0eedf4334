use crate::analysis::verify;
use crate::compute::CancelToken;
use crate::config::MinerConfig;
use crate::error::MinerError;
use crate::oracle::SipOracle;
use crate::solver::Miner;
use crate::store::GraphParams;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: MinerError) -> PyErr {
    match err {
        MinerError::ThreadPool(_) | MinerError::SurvivorOverflow { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Shared stop flag for a running `_Miner.mine`. Held separately from the
/// miner so another thread can fire it without borrowing the miner.
#[pyclass(name = "_CancelToken")]
#[derive(Debug, Clone)]
pub struct PyCancelToken {
    inner: CancelToken,
}

#[pymethods]
impl PyCancelToken {
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn reset(&self) {
        self.inner.reset();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

#[pyclass(name = "_Miner")]
pub struct PyMiner {
    inner: Miner,
    cancel: CancelToken,
}

#[pymethods]
impl PyMiner {
    #[new]
    #[pyo3(signature = (threads=1, edge_bits=20, part_bits=0, ntrims=None, proof_size=42, max_sols=8))]
    pub fn new(
        threads: usize,
        edge_bits: u32,
        part_bits: u32,
        ntrims: Option<u32>,
        proof_size: usize,
        max_sols: usize,
    ) -> PyResult<Self> {
        let config = MinerConfig { threads, edge_bits, part_bits, ntrims, proof_size, max_sols, ..Default::default() };
        let inner = Miner::new(config).map_err(to_py_err)?;
        let cancel = inner.cancel_token();
        Ok(Self { inner, cancel })
    }

    /// Take this before calling `mine` from another thread.
    pub fn cancel_token(&self) -> PyCancelToken {
        PyCancelToken { inner: self.cancel.clone() }
    }

    /// Returns `(nonce, edges)` pairs for every proof found in the range.
    /// The GIL is released while the search runs.
    #[pyo3(signature = (header, nonce=0, range=1, capacity=None))]
    pub fn mine(
        &mut self,
        py: Python<'_>,
        header: &[u8],
        nonce: u32,
        range: u32,
        capacity: Option<usize>,
    ) -> PyResult<Vec<(u32, Vec<u64>)>> {
        self.inner.set_range(nonce, range).map_err(to_py_err)?;
        let header = header.to_vec();
        let miner = &mut self.inner;
        let report = py.detach(move || miner.mine(&header, capacity)).map_err(to_py_err)?;
        Ok(report.proofs.into_iter().map(|p| (p.nonce, p.edges)).collect())
    }
}

/// Checks a proof; raises `ValueError` with the reason when it is invalid.
#[pyfunction]
#[pyo3(signature = (header, nonce, edges, edge_bits=20, proof_size=42))]
fn verify_proof(header: &[u8], nonce: u32, edges: Vec<u64>, edge_bits: u32, proof_size: usize) -> PyResult<()> {
    if !(1..=32).contains(&edge_bits) {
        return Err(PyValueError::new_err(format!("edge_bits must be in 1..=32, got {edge_bits}")));
    }
    let params = GraphParams::new(edge_bits, 0, proof_size);
    let oracle = SipOracle::from_header(header, nonce, &params).map_err(to_py_err)?;
    verify(&oracle, &params, &edges).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The `cuckoo._core` extension module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMiner>()?;
    m.add_class::<PyCancelToken>()?;
    m.add_function(wrap_pyfunction!(verify_proof, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_stops_the_miner_it_came_from() {
        let mut miner = PyMiner::new(1, 12, 0, None, 2, 8).unwrap();
        let token = miner.cancel_token();
        token.cancel();
        assert!(miner.inner.cancel_token().is_cancelled());

        let report = miner.inner.mine(b"test", None).unwrap();
        assert!(report.aborted);

        token.reset();
        assert!(!token.is_cancelled());
        assert!(!miner.inner.mine(b"test", None).unwrap().aborted);
    }
}
