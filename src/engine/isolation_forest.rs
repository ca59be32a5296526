// ==========================================
// 电机运行监测系统 - 隔离森林
// ==========================================
// 模型: 随机递归划分隔离样本点，越少划分即被隔离越异常
// - 每棵树在 min(max_samples, N) 个无放回抽样上生长
// - 结点随机选一个非常量特征，在 [min, max) 内均匀取切分点
// - 深度上限 ceil(log2(sample_size))
// - 截断叶子补偿平均路径长度 c(size)
// - 异常分 s(x) = 2^(-E[h(x)] / c(sample_size))，取值 (0, 1]
// 红线: 同一数据 + 同一种子 → 同一结果
// ==========================================

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// 隔离森林参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

// ==========================================
// IsolationForest
// ==========================================
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    /// 在特征矩阵上训练（每行一个样本，各行列数一致）
    ///
    /// 调用方保证 data 非空、列数 ≥ 1、参数已校验
    pub fn fit(data: &[Vec<f64>], params: ForestParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let sample_size = params.max_samples.min(data.len()).max(1);
        let depth_limit = (sample_size.max(2) as f64).log2().ceil() as usize;

        let trees = (0..params.n_estimators)
            .map(|_| {
                let indices = index::sample(&mut rng, data.len(), sample_size).into_vec();
                grow(data, indices, 0, depth_limit, &mut rng)
            })
            .collect();

        Self { trees, sample_size }
    }

    /// 单个样本在森林中的平均路径长度 E[h(x)]
    pub fn mean_path_length(&self, x: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|tree| path_length(tree, x, 0)).sum();
        total / self.trees.len() as f64
    }

    /// 异常分（越高越异常）
    pub fn anomaly_score(&self, x: &[f64]) -> f64 {
        let normalizer = average_path_length(self.sample_size);
        if normalizer <= 0.0 {
            return 0.5;
        }
        2f64.powf(-self.mean_path_length(x) / normalizer)
    }

    /// 批量异常分
    pub fn score_samples(&self, data: &[Vec<f64>]) -> Vec<f64> {
        data.iter().map(|x| self.anomaly_score(x)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn grow(
    data: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    depth_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= depth_limit || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // 候选特征: 当前结点内非常量的列
    let n_features = data[indices[0]].len();
    let candidates: Vec<(usize, f64, f64)> = (0..n_features)
        .filter_map(|feature| {
            let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                let v = data[i][feature];
                (lo.min(v), hi.max(v))
            });
            (max > min).then_some((feature, min, max))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);

    // threshold ∈ [min, max) → 两侧均非空
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| data[i][feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(data, left, depth + 1, depth_limit, rng)),
        right: Box::new(grow(data, right, depth + 1, depth_limit, rng)),
    }
}

fn path_length(node: &Node, x: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if x[*feature] <= *threshold {
                path_length(left, x, depth + 1)
            } else {
                path_length(right, x, depth + 1)
            }
        }
    }
}

/// 二叉搜索树中不成功查找的平均路径长度 c(n)
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
