//! Upstream answer generator domain

mod answer;

pub use answer::AnswerGenerator;

#[cfg(test)]
pub use answer::mock::MockGenerator;
