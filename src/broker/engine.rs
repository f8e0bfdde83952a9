//! Broker engine
//!
//! Routing follows topic-exchange rules: a delivery published to an exchange
//! under a routing key is copied to every queue bound to that exchange with a
//! matching pattern, at most once per queue. Each queue then hands the
//! delivery to one of its consumers, round robin. A queue with no consumer
//! keeps deliveries in its backlog until one registers.

use std::collections::{HashMap, HashSet, VecDeque};

use tokio::sync::mpsc::error::SendError;
use tracing::{debug, info, warn};

use crate::broker::message::Delivery;
use crate::client::{Consumer, ConsumerTag};
use crate::topology::{Binding, Queue, TopicExchange, Topology, topic};
use crate::utils::error::BrokerError;

#[derive(Debug)]
struct QueueState {
    declaration: Queue,
    consumers: Vec<ConsumerTag>,
    next_consumer: usize,
    backlog: VecDeque<Delivery>,
}

impl QueueState {
    fn new(declaration: Queue) -> Self {
        Self {
            declaration,
            consumers: Vec::new(),
            next_consumer: 0,
            backlog: VecDeque::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Broker {
    exchanges: HashMap<String, TopicExchange>,
    queues: HashMap<String, QueueState>,
    bindings: Vec<Binding>,
    consumers: HashMap<ConsumerTag, Consumer>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a queue. Redeclaring with the same durability is a no-op.
    pub fn declare_queue(&mut self, queue: Queue) -> Result<(), BrokerError> {
        if let Some(existing) = self.queues.get(&queue.name) {
            if existing.declaration.durable != queue.durable {
                return Err(BrokerError::PreconditionFailed {
                    name: queue.name,
                    existing: existing.declaration.durable,
                });
            }
            return Ok(());
        }

        info!(queue = %queue.name, durable = queue.durable, "Declared queue");
        self.queues.insert(queue.name.clone(), QueueState::new(queue));
        Ok(())
    }

    pub fn declare_exchange(&mut self, exchange: TopicExchange) {
        if !self.exchanges.contains_key(&exchange.name) {
            info!(exchange = %exchange.name, kind = "topic", "Declared exchange");
            self.exchanges.insert(exchange.name.clone(), exchange);
        }
    }

    /// Bind a queue to an exchange. Both must already be declared.
    pub fn declare_binding(&mut self, binding: Binding) -> Result<(), BrokerError> {
        if !self.exchanges.contains_key(&binding.exchange) {
            return Err(BrokerError::ExchangeNotFound {
                name: binding.exchange,
            });
        }
        if !self.queues.contains_key(&binding.queue) {
            return Err(BrokerError::QueueNotFound {
                name: binding.queue,
            });
        }

        if !self.bindings.contains(&binding) {
            info!(
                queue = %binding.queue,
                exchange = %binding.exchange,
                pattern = %binding.pattern,
                "Declared binding"
            );
            self.bindings.push(binding);
        }
        Ok(())
    }

    /// Declare the queue, exchange and binding of a topology, in that order.
    pub fn declare(&mut self, topology: &Topology) -> Result<(), BrokerError> {
        self.declare_queue(topology.queue.clone())?;
        self.declare_exchange(topology.exchange.clone());
        self.declare_binding(topology.binding.clone())
    }

    /// Attach a consumer to its queue and flush any waiting backlog to it.
    pub fn register_consumer(&mut self, consumer: Consumer) -> Result<(), BrokerError> {
        let queue = consumer.queue.clone();
        let state = self
            .queues
            .get_mut(&queue)
            .ok_or_else(|| BrokerError::QueueNotFound {
                name: queue.clone(),
            })?;

        state.consumers.push(consumer.tag.clone());
        info!(consumer = %consumer.tag, queue = %queue, "Registered consumer");
        self.consumers.insert(consumer.tag.clone(), consumer);

        self.drain_backlog(&queue);
        Ok(())
    }

    pub fn cancel_consumer(&mut self, tag: &str) -> Result<(), BrokerError> {
        let consumer = self
            .consumers
            .remove(tag)
            .ok_or_else(|| BrokerError::ConsumerNotFound {
                tag: tag.to_string(),
            })?;

        if let Some(state) = self.queues.get_mut(&consumer.queue) {
            state.consumers.retain(|t| t != tag);
        }
        info!(consumer = %tag, queue = %consumer.queue, "Cancelled consumer");
        Ok(())
    }

    /// Route `delivery` through `exchange` and return how many queues received it.
    ///
    /// Zero means no binding matched and the delivery was dropped.
    pub fn publish(
        &mut self,
        exchange: &str,
        routing_key: &str,
        mut delivery: Delivery,
    ) -> Result<usize, BrokerError> {
        if !self.exchanges.contains_key(exchange) {
            return Err(BrokerError::ExchangeNotFound {
                name: exchange.to_string(),
            });
        }

        delivery.exchange = exchange.to_string();
        delivery.routing_key = routing_key.to_string();

        let mut seen = HashSet::new();
        let targets: Vec<String> = self
            .bindings
            .iter()
            .filter(|b| b.exchange == exchange && topic::matches(&b.pattern, routing_key))
            .filter(|b| seen.insert(b.queue.clone()))
            .map(|b| b.queue.clone())
            .collect();

        if targets.is_empty() {
            warn!(exchange, routing_key, message_id = %delivery.message_id, "Unroutable message dropped");
            return Ok(0);
        }

        for queue in &targets {
            self.enqueue(queue, delivery.clone());
        }

        debug!(
            exchange,
            routing_key,
            message_id = %delivery.message_id,
            queues = targets.len(),
            "Routed message"
        );
        Ok(targets.len())
    }

    /// Deliveries waiting in `queue` for a consumer.
    pub fn queue_depth(&self, queue: &str) -> Option<usize> {
        self.queues.get(queue).map(|q| q.backlog.len())
    }

    pub fn consumer_count(&self, queue: &str) -> Option<usize> {
        self.queues.get(queue).map(|q| q.consumers.len())
    }

    pub fn has_exchange(&self, name: &str) -> bool {
        self.exchanges.contains_key(name)
    }

    pub fn has_queue(&self, name: &str) -> bool {
        self.queues.contains_key(name)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn enqueue(&mut self, queue: &str, delivery: Delivery) {
        if let Some(state) = self.queues.get_mut(queue) {
            state.backlog.push_back(delivery);
        }
        self.drain_backlog(queue);
    }

    fn drain_backlog(&mut self, queue: &str) {
        let Some(state) = self.queues.get_mut(queue) else {
            return;
        };

        while let Some(delivery) = state.backlog.pop_front() {
            if let Err(undelivered) = deliver(state, &mut self.consumers, delivery) {
                state.backlog.push_front(undelivered);
                break;
            }
        }
    }
}

/// Send to the next live consumer of `state`. Consumers whose channel is
/// closed are dropped along the way. Gives the delivery back when none is left.
fn deliver(
    state: &mut QueueState,
    consumers: &mut HashMap<ConsumerTag, Consumer>,
    mut delivery: Delivery,
) -> Result<(), Delivery> {
    while !state.consumers.is_empty() {
        let index = state.next_consumer % state.consumers.len();
        let tag = state.consumers[index].clone();

        if let Some(consumer) = consumers.get(&tag) {
            match consumer.sender.send(delivery) {
                Ok(()) => {
                    state.next_consumer = index + 1;
                    return Ok(());
                }
                Err(SendError(returned)) => {
                    warn!(consumer = %tag, queue = %state.declaration.name, "Consumer channel closed; removing consumer");
                    delivery = returned;
                }
            }
        }

        consumers.remove(&tag);
        state.consumers.remove(index);
    }

    Err(delivery)
}
