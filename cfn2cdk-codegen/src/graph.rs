//! Resource dependency graph and instantiation order.

use std::collections::BTreeSet;

use cfn2cdk_template::{Resource, Template};
use indexmap::IndexMap;

use crate::{SynthError, SynthResult};

/// Resources and the resources each one depends on.
///
/// Edges come from `Ref`, `Fn::GetAtt` and `Fn::Sub` references anywhere in
/// a resource's properties or metadata (both branches of every `Fn::If`), and
/// from `DependsOn`. References to parameters, pseudo parameters and
/// resources outside the graph add no edge.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    ids: IndexMap<String, BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Graph over every resource of the template.
    pub fn from_template(template: &Template) -> Self {
        Self::from_resources(template.resources.values())
    }

    /// Graph over the given resources, in declaration order.
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let resources: Vec<&Resource> = resources.into_iter().collect();
        let mut ids: IndexMap<String, BTreeSet<usize>> = resources
            .iter()
            .map(|r| (r.logical_id.clone(), BTreeSet::new()))
            .collect();

        for (index, resource) in resources.iter().enumerate() {
            let mut targets: Vec<&str> = resource.depends_on.iter().map(String::as_str).collect();
            for expr in resource.expressions() {
                expr.visit_references(&mut |reference| {
                    if let Some(target) = reference.target() {
                        targets.push(target);
                    }
                });
            }

            let dependencies: BTreeSet<usize> = targets
                .into_iter()
                .filter_map(|target| ids.get_index_of(target))
                .collect();
            if let Some((_, deps)) = ids.get_index_mut(index) {
                *deps = dependencies;
            }
        }

        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Logical IDs `logical_id` depends on, in declaration order.
    pub fn dependencies(&self, logical_id: &str) -> Vec<&str> {
        self.ids
            .get(logical_id)
            .map(|deps| deps.iter().filter_map(|&i| self.id(i)).collect())
            .unwrap_or_default()
    }

    fn id(&self, index: usize) -> Option<&str> {
        self.ids.get_index(index).map(|(id, _)| id.as_str())
    }

    /// Topological order; unconstrained resources keep declaration order.
    pub fn order(&self) -> SynthResult<Vec<String>> {
        let count = self.ids.len();
        let mut in_degree: Vec<usize> = self.ids.values().map(BTreeSet::len).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (index, deps) in self.ids.values().enumerate() {
            for &dep in deps {
                dependents[dep].push(index);
            }
        }

        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(count);
        while let Some(index) = ready.pop_first() {
            order.push(index);
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < count {
            let placed: BTreeSet<usize> = order.iter().copied().collect();
            return Err(SynthError::Cycle {
                cycle: self.find_cycle(&placed),
            });
        }

        Ok(order
            .into_iter()
            .filter_map(|i| self.id(i).map(str::to_string))
            .collect())
    }

    /// One concrete cycle among the resources Kahn's algorithm could not place.
    fn find_cycle(&self, placed: &BTreeSet<usize>) -> Vec<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            OnPath,
            Done,
        }

        fn visit(
            graph: &DependencyGraph,
            index: usize,
            marks: &mut [Mark],
            path: &mut Vec<usize>,
        ) -> Option<Vec<usize>> {
            marks[index] = Mark::OnPath;
            path.push(index);
            if let Some((_, deps)) = graph.ids.get_index(index) {
                for &dep in deps {
                    match marks[dep] {
                        Mark::OnPath => {
                            let start = path.iter().position(|&i| i == dep).unwrap_or_default();
                            let mut cycle = path[start..].to_vec();
                            cycle.push(dep);
                            return Some(cycle);
                        }
                        Mark::New => {
                            if let Some(cycle) = visit(graph, dep, marks, path) {
                                return Some(cycle);
                            }
                        }
                        Mark::Done => {}
                    }
                }
            }
            path.pop();
            marks[index] = Mark::Done;
            None
        }

        let mut marks: Vec<Mark> = (0..self.ids.len())
            .map(|i| if placed.contains(&i) { Mark::Done } else { Mark::New })
            .collect();
        for start in 0..self.ids.len() {
            if marks[start] != Mark::New {
                continue;
            }
            let mut path = Vec::new();
            if let Some(cycle) = visit(self, start, &mut marks, &mut path) {
                return cycle
                    .into_iter()
                    .filter_map(|i| self.id(i).map(str::to_string))
                    .collect();
            }
        }
        Vec::new()
    }
}

/// Instantiation order for every resource of `template`.
pub fn build_order(template: &Template) -> SynthResult<Vec<String>> {
    DependencyGraph::from_template(template).order()
}

#[cfg(test)]
mod tests {
    use cfn2cdk_template::parse_template;

    use super::*;

    fn order(yaml: &str) -> SynthResult<Vec<String>> {
        build_order(&parse_template(yaml, "graph.yaml").unwrap())
    }

    #[test]
    fn test_reference_forces_reorder() {
        let result = order(
            r#"
Resources:
  SecurityGroup:
    Type: AWS::EC2::SecurityGroup
    Properties:
      VpcId: !Ref Vpc
  Vpc:
    Type: AWS::EC2::VPC
"#,
        )
        .unwrap();
        assert_eq!(result, vec!["Vpc", "SecurityGroup"]);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let result = order(
            r#"
Resources:
  C:
    Type: AWS::SNS::Topic
  A:
    Type: AWS::SNS::Topic
  B:
    Type: AWS::SNS::Topic
    DependsOn: C
"#,
        )
        .unwrap();
        assert_eq!(result, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_edges_from_sub_get_att_and_depends_on() {
        let template = parse_template(
            r#"
Parameters:
  Name:
    Type: String
    Default: x
Conditions:
  Never: !Equals [a, b]
Resources:
  Role:
    Type: AWS::IAM::Role
    Properties:
      Description: !Sub "${Bucket.Arn}-${Name}-${AWS::Region}"
      Path: !If [Never, !GetAtt Queue.Arn, !Ref AWS::NoValue]
    DependsOn: [Topic]
  Bucket:
    Type: AWS::S3::Bucket
  Queue:
    Type: AWS::SQS::Queue
  Topic:
    Type: AWS::SNS::Topic
"#,
            "graph.yaml",
        )
        .unwrap();
        let graph = DependencyGraph::from_template(&template);

        assert_eq!(graph.dependencies("Role"), vec!["Bucket", "Queue", "Topic"]);
        assert_eq!(
            graph.order().unwrap(),
            vec!["Bucket", "Queue", "Topic", "Role"]
        );
    }

    #[test]
    fn test_order_respects_every_edge() {
        let template = parse_template(
            r#"
Resources:
  D:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Join ["", [!Ref B, !Ref C]]
  C:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref A
  B:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref A
  A:
    Type: AWS::SNS::Topic
"#,
            "graph.yaml",
        )
        .unwrap();
        let graph = DependencyGraph::from_template(&template);
        let order = graph.order().unwrap();
        let position = |id: &str| order.iter().position(|o| o == id).unwrap();

        for id in ["A", "B", "C", "D"] {
            for dep in graph.dependencies(id) {
                assert!(position(dep) < position(id), "{dep} must precede {id}");
            }
        }
        assert_eq!(order, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_cycle() {
        let err = order(
            r#"
Resources:
  Free:
    Type: AWS::SNS::Topic
  A:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !GetAtt B.TopicName
  B:
    Type: AWS::SNS::Topic
    DependsOn: A
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthError::Cycle {
                cycle: vec!["A".into(), "B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let err = order(
            r#"
Resources:
  Loop:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref Loop
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthError::Cycle {
                cycle: vec!["Loop".into(), "Loop".into()]
            }
        );
    }

    #[test]
    fn test_graph_over_subset() {
        let template = parse_template(
            r#"
Resources:
  A:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref B
  B:
    Type: AWS::SNS::Topic
"#,
            "graph.yaml",
        )
        .unwrap();
        let graph = DependencyGraph::from_resources(template.resource("A"));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.order().unwrap(), vec!["A"]);
    }
}
