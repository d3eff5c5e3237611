// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cooperative simulation of a compute dispatch.
//!
//! A dispatch is a 3D grid of workgroups, each a 3D block of invocations. The
//! invocations of one workgroup share a [`ComputeKernel::SharedData`] (the
//! equivalent of `var<workgroup>` memory) and synchronize with barriers.
//!
//! Invocations are state machines: every call to [`ComputeKernel::step`] runs
//! one invocation up to its next barrier (or to its end). The scheduler advances
//! a workgroup in lockstep phases, stepping each member exactly once per phase,
//! so nothing written after barrier `N` is visible to anyone before every member
//! has reached barrier `N`. Execution order within a phase is fixed (local id
//! order), which makes every dispatch fully deterministic.

use thiserror::Error;

/// A size or coordinate in the 3D dispatch space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Number of coordinates inside a block of this size.
    pub const fn count(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// All coordinates inside a block of this size, in row-major order: `z` is the
    /// outermost axis and `x` the innermost.
    pub fn iter(self) -> impl Iterator<Item = Self> {
        (0..self.z).flat_map(move |z| {
            (0..self.y).flat_map(move |y| (0..self.x).map(move |x| Self::new(x, y, z)))
        })
    }
}

impl From<(u32, u32, u32)> for Dim3 {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Where an invocation stopped after one [`ComputeKernel::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Suspended at a workgroup barrier.
    Barrier,
    /// Returned from the entry point.
    Done,
}

/// A compute shader that can be run by [`dispatch`].
pub trait ComputeKernel {
    /// Memory shared by all invocations of one workgroup.
    type SharedData;
    /// Private state of one invocation, including where it resumes.
    type Invocation;
    /// Resources bound for the whole dispatch, such as output buffers.
    type Context: ?Sized;

    /// Creates the shared memory of a new workgroup.
    fn create_shared_data(&self) -> Self::SharedData;

    /// Creates an invocation at its entry point.
    fn invocation(&self, workgroup_id: Dim3, local_id: Dim3) -> Self::Invocation;

    /// Runs `invocation` until it reaches a barrier or returns.
    fn step(
        &self,
        invocation: &mut Self::Invocation,
        shared: &mut Self::SharedData,
        ctx: &mut Self::Context,
    ) -> Step;
}

/// Errors that can occur while simulating a dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DispatchError {
    /// Some invocations of a workgroup waited at a barrier while others returned.
    ///
    /// On a GPU this is a barrier in non-uniform control flow, which is undefined
    /// behavior.
    #[error(
        "workgroup {workgroup_id:?}: {arrived} of {workgroup_size} invocations reached barrier {phase}, the rest returned"
    )]
    DivergentBarrier {
        workgroup_id: Dim3,
        phase: u32,
        arrived: usize,
        workgroup_size: usize,
    },
}

/// Counters collected while running a dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Number of workgroups run.
    pub workgroups: usize,
    /// Number of invocations run, over all workgroups.
    pub invocations: usize,
    /// Number of lockstep phases, over all workgroups.
    pub phases: u64,
}

/// Runs `kernel` over a `grid` of workgroups of `workgroup_size` invocations.
///
/// Workgroups run one after another, in row-major order of their ids. Returns
/// once every invocation of every workgroup has returned.
pub fn dispatch<K: ComputeKernel>(
    grid: Dim3,
    workgroup_size: Dim3,
    kernel: &K,
    ctx: &mut K::Context,
) -> Result<DispatchStats, DispatchError> {
    let mut stats = DispatchStats::default();
    for workgroup_id in grid.iter() {
        let phases = run_workgroup(workgroup_id, workgroup_size, kernel, ctx)?;
        log::trace!("Workgroup {workgroup_id:?} finished after {phases} phases");
        stats.workgroups += 1;
        stats.invocations += workgroup_size.count();
        stats.phases += u64::from(phases);
    }
    log::debug!(
        "Dispatched {grid:?} x {workgroup_size:?}: {} workgroups, {} invocations, {} phases",
        stats.workgroups,
        stats.invocations,
        stats.phases
    );
    Ok(stats)
}

/// Drives one workgroup to completion, returning the number of phases it took.
fn run_workgroup<K: ComputeKernel>(
    workgroup_id: Dim3,
    workgroup_size: Dim3,
    kernel: &K,
    ctx: &mut K::Context,
) -> Result<u32, DispatchError> {
    let mut shared = kernel.create_shared_data();
    let mut invocations: Vec<K::Invocation> = workgroup_size
        .iter()
        .map(|local_id| kernel.invocation(workgroup_id, local_id))
        .collect();
    if invocations.is_empty() {
        return Ok(0);
    }

    let mut phase = 0;
    loop {
        let mut arrived = 0;
        for invocation in &mut invocations {
            if kernel.step(invocation, &mut shared, ctx) == Step::Barrier {
                arrived += 1;
            }
        }
        phase += 1;
        if arrived == 0 {
            return Ok(phase);
        }
        if arrived != invocations.len() {
            return Err(DispatchError::DivergentBarrier {
                workgroup_id,
                phase,
                arrived,
                workgroup_size: invocations.len(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{dispatch, ComputeKernel, Dim3, DispatchError, DispatchStats, Step};

    #[test]
    fn iterates_row_major() {
        let ids: Vec<_> = Dim3::new(2, 2, 2).iter().collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(ids[0], Dim3::new(0, 0, 0));
        assert_eq!(ids[1], Dim3::new(1, 0, 0));
        assert_eq!(ids[2], Dim3::new(0, 1, 0));
        assert_eq!(ids[4], Dim3::new(0, 0, 1));
        assert_eq!(ids[7], Dim3::new(1, 1, 1));
        assert_eq!(Dim3::new(3, 0, 5).iter().count(), 0);
        assert_eq!(Dim3::from((4, 2, 3)).count(), 24);
    }

    /// Every invocation writes its id into shared memory, then after a barrier
    /// reads its neighbor's slot. Without lockstep phases the last invocation
    /// would read a slot nobody has written yet.
    struct Rotate;

    struct RotateInvocation {
        workgroup: u32,
        local: usize,
        pc: u32,
    }

    impl ComputeKernel for Rotate {
        type SharedData = Vec<u32>;
        type Invocation = RotateInvocation;
        type Context = Vec<(u32, usize, u32)>;

        fn create_shared_data(&self) -> Vec<u32> {
            vec![u32::MAX; 4]
        }

        fn invocation(&self, workgroup_id: Dim3, local_id: Dim3) -> RotateInvocation {
            RotateInvocation {
                workgroup: workgroup_id.x,
                local: local_id.x as usize,
                pc: 0,
            }
        }

        fn step(
            &self,
            invocation: &mut RotateInvocation,
            shared: &mut Vec<u32>,
            ctx: &mut Self::Context,
        ) -> Step {
            invocation.pc += 1;
            match invocation.pc {
                1 => {
                    shared[invocation.local] = invocation.workgroup * 10 + invocation.local as u32;
                    Step::Barrier
                }
                _ => {
                    let neighbor = shared[(invocation.local + 1) % shared.len()];
                    ctx.push((invocation.workgroup, invocation.local, neighbor));
                    Step::Done
                }
            }
        }
    }

    #[test]
    fn barrier_orders_shared_writes() {
        let mut out = Vec::new();
        let stats = dispatch(Dim3::new(2, 1, 1), Dim3::new(4, 1, 1), &Rotate, &mut out).unwrap();
        assert_eq!(
            stats,
            DispatchStats {
                workgroups: 2,
                invocations: 8,
                phases: 4,
            }
        );
        assert_eq!(
            out,
            vec![
                (0, 0, 1),
                (0, 1, 2),
                (0, 2, 3),
                (0, 3, 0),
                (1, 0, 11),
                (1, 1, 12),
                (1, 2, 13),
                (1, 3, 10),
            ]
        );
    }

    /// Only even invocations wait at the barrier.
    struct Divergent;

    impl ComputeKernel for Divergent {
        type SharedData = ();
        type Invocation = (u32, bool);
        type Context = ();

        fn create_shared_data(&self) {}

        fn invocation(&self, _: Dim3, local_id: Dim3) -> (u32, bool) {
            (local_id.x, false)
        }

        fn step(&self, invocation: &mut (u32, bool), _: &mut (), _: &mut ()) -> Step {
            if invocation.0 % 2 == 0 && !invocation.1 {
                invocation.1 = true;
                Step::Barrier
            } else {
                Step::Done
            }
        }
    }

    #[test]
    fn divergent_barrier_is_reported() {
        let err = dispatch(Dim3::new(3, 1, 1), Dim3::new(4, 1, 1), &Divergent, &mut ()).unwrap_err();
        assert_eq!(
            err,
            DispatchError::DivergentBarrier {
                workgroup_id: Dim3::new(0, 0, 0),
                phase: 1,
                arrived: 2,
                workgroup_size: 4,
            }
        );
    }

    #[test]
    fn empty_dispatches() {
        let mut out = Vec::new();
        let stats = dispatch(Dim3::new(0, 1, 1), Dim3::new(4, 1, 1), &Rotate, &mut out).unwrap();
        assert_eq!(stats, DispatchStats::default());
        let stats = dispatch(Dim3::new(2, 1, 1), Dim3::new(0, 1, 1), &Rotate, &mut out).unwrap();
        assert_eq!(stats.workgroups, 2);
        assert_eq!(stats.phases, 0);
        assert!(out.is_empty());
    }
}
